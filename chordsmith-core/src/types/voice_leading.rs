//! Voicing and voice leading
//!
//! Turns a resolved [`Chord`] into absolute MIDI pitches. The only state
//! carried from chord to chord is the previous voicing, which callers pass
//! in explicitly; [`voice_sequence`] shows the intended left-to-right fold.
//!
//! Absolute pitches are computed as `i32` and folded into 0..=127 by whole
//! octaves at the end, so every strategy can place notes freely.

use crate::types::chord::Chord;
use crate::types::note::{fold_into_midi_range, PitchClass};
use crate::types::options::VoicingStrategy;

/// Highest octave index considered when searching for a pitch class
const MAX_OCTAVE: i32 = 10;

/// Concrete pitches for one chord
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voicing {
    /// Chord tones, ascending
    pub notes: Vec<u8>,
    /// Bass note, below the lowest chord tone unless range folding prevents it
    pub bass: u8,
}

impl Voicing {
    pub fn lowest(&self) -> Option<u8> {
        self.notes.first().copied()
    }
}

/// Voice one chord.
///
/// `base_octave` sets the register: octave `n` starts at MIDI note `n * 12`.
/// `previous` is the voicing of the chord before this one and only matters
/// for [`VoicingStrategy::Smooth`].
pub fn voice_chord(
    chord: &Chord,
    strategy: VoicingStrategy,
    base_octave: u8,
    previous: Option<&[u8]>,
) -> Voicing {
    let base_c = base_octave as i32 * 12;
    let pcs = chord.pitch_classes();

    let raw = match strategy {
        VoicingStrategy::RootPosition => root_position(pcs, base_c),
        VoicingStrategy::FirstInversion => invert(root_position(pcs, base_c), 1),
        VoicingStrategy::SecondInversion => invert(root_position(pcs, base_c), 2),
        VoicingStrategy::Smooth => match previous {
            Some(prev) if !prev.is_empty() => smooth(pcs, prev),
            _ => root_position(pcs, base_c),
        },
        VoicingStrategy::Pianist => pianist(pcs, base_c),
        VoicingStrategy::Open => open(root_position(pcs, base_c)),
        VoicingStrategy::Spread => spread(pcs, base_c),
        VoicingStrategy::Cocktail => cocktail(chord, base_c),
    };

    let mut notes: Vec<u8> = raw.into_iter().map(fold_into_midi_range).collect();
    notes.sort_unstable();

    let bass = bass_below(chord.bass(), base_c, notes.first().copied());
    Voicing { notes, bass }
}

/// Voice a run of chords, threading each voicing into the next call
pub fn voice_sequence<'a>(
    chords: impl IntoIterator<Item = &'a Chord>,
    strategy: VoicingStrategy,
    base_octave: u8,
) -> Vec<Voicing> {
    chords
        .into_iter()
        .scan(None::<Vec<u8>>, |previous, chord| {
            let voicing = voice_chord(chord, strategy, base_octave, previous.as_deref());
            *previous = Some(voicing.notes.clone());
            Some(voicing)
        })
        .collect()
}

/// Lowest pitch of class `pc` that is >= `floor`
fn at_or_above(pc: PitchClass, floor: i32) -> i32 {
    let candidate = floor - floor.rem_euclid(12) + pc as i32;
    if candidate < floor {
        candidate + 12
    } else {
        candidate
    }
}

/// Lowest pitch of class `pc` that is > `floor`
fn above(pc: PitchClass, floor: i32) -> i32 {
    at_or_above(pc, floor + 1)
}

/// Stack pitch classes upward: the first at or above `start`, each next one
/// at the lowest pitch above the note before it
fn stack_from(pcs: &[PitchClass], start: i32) -> Vec<i32> {
    let mut notes = Vec::with_capacity(pcs.len());
    for pc in pcs {
        let note = match notes.last() {
            None => at_or_above(*pc, start),
            Some(prev) => above(*pc, *prev),
        };
        notes.push(note);
    }
    notes
}

fn root_position(pcs: &[PitchClass], base_c: i32) -> Vec<i32> {
    stack_from(pcs, base_c)
}

/// Move the `n` lowest tones up an octave. Chords with fewer than two tones
/// have no inversions; `n` is capped so at least one tone stays put.
fn invert(mut notes: Vec<i32>, n: usize) -> Vec<i32> {
    if notes.len() < 2 {
        return notes;
    }
    let n = n.min(notes.len() - 1);
    for note in notes.iter_mut().take(n) {
        *note += 12;
    }
    notes.sort_unstable();
    notes
}

/// Nearest-neighbour voice leading: every pitch class independently takes
/// the octave closest to any note of the previous voicing. Equal distances
/// go to the lower pitch.
fn smooth(pcs: &[PitchClass], previous: &[u8]) -> Vec<i32> {
    pcs.iter()
        .map(|pc| {
            (0..=MAX_OCTAVE)
                .map(|octave| octave * 12 + *pc as i32)
                .filter(|pitch| *pitch <= 127)
                .min_by_key(|pitch| (distance_to_nearest(*pitch, previous), *pitch))
                .unwrap_or(*pc as i32)
        })
        .collect()
}

/// Distance in semitones from `pitch` to the closest note of `notes`
pub fn distance_to_nearest(pitch: i32, notes: &[u8]) -> u32 {
    notes
        .iter()
        .map(|n| (pitch - *n as i32).unsigned_abs())
        .min()
        .unwrap_or(u32::MAX)
}

/// Sum over the new voicing of each note's distance to the nearest note of
/// the previous one
pub fn total_movement(previous: &[u8], next: &[u8]) -> u32 {
    next.iter()
        .map(|n| distance_to_nearest(*n as i32, previous))
        .sum()
}

/// Pitches present in both voicings
pub fn common_tones(previous: &[u8], next: &[u8]) -> Vec<u8> {
    next.iter()
        .copied()
        .filter(|n| previous.contains(n))
        .collect()
}

/// Root alone an octave below the base, remaining tones clustered within
/// the octave starting at the base octave's C
fn pianist(pcs: &[PitchClass], base_c: i32) -> Vec<i32> {
    let Some(root) = pcs.first() else {
        return Vec::new();
    };
    let left = at_or_above(*root, base_c - 12);
    let upper = if pcs.len() >= 3 { &pcs[1..] } else { pcs };

    let mut notes = vec![left];
    notes.extend(upper.iter().map(|pc| at_or_above(*pc, base_c)));
    notes
}

/// Raise every second voice of a close voicing by an octave
fn open(mut notes: Vec<i32>) -> Vec<i32> {
    for note in notes.iter_mut().skip(1).step_by(2) {
        *note += 12;
    }
    notes
}

/// Each tone at least an octave above the one below it
fn spread(pcs: &[PitchClass], base_c: i32) -> Vec<i32> {
    let mut notes: Vec<i32> = Vec::with_capacity(pcs.len());
    for pc in pcs {
        let note = match notes.last() {
            None => at_or_above(*pc, base_c),
            Some(prev) => at_or_above(*pc, prev + 12),
        };
        notes.push(note);
    }
    notes
}

/// Left-hand shell (root plus seventh, else fifth) an octave below the
/// base, right hand takes the other tones from the base octave with its top
/// note doubled an octave up
fn cocktail(chord: &Chord, base_c: i32) -> Vec<i32> {
    let pcs = chord.pitch_classes();
    let root = chord.root();

    let shell_interval = [10u8, 11, 7]
        .into_iter()
        .find(|interval| chord.contains_interval(*interval));
    let shell_pc = shell_interval.map(|i| (root + i) % 12);

    let left_root = at_or_above(root, base_c - 12);
    let mut notes = vec![left_root];
    if let Some(pc) = shell_pc {
        notes.push(above(pc, left_root));
    }

    let upper: Vec<PitchClass> = pcs
        .iter()
        .copied()
        .filter(|pc| *pc != root && Some(*pc) != shell_pc)
        .collect();
    let right = stack_from(&upper, base_c);
    if let Some(top) = right.last() {
        if top + 12 <= 127 {
            notes.push(top + 12);
        }
    }
    notes.extend(right);
    notes
}

/// Bass pitch class an octave below the base octave, dropped further until
/// it sits below the lowest chord tone. With no room below the lowest tone
/// the bass keeps its pitch class at the lowest MIDI pitch carrying it.
fn bass_below(bass_pc: PitchClass, base_c: i32, lowest: Option<u8>) -> u8 {
    let mut bass = base_c - 12 + bass_pc as i32;
    if let Some(lowest) = lowest {
        while bass >= lowest as i32 {
            bass -= 12;
        }
    }
    fold_into_midi_range(bass)
}
