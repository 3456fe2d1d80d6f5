//! Pitch classes, note names and MIDI range helpers
//!
//! Pitch classes use the chromatic representation 0-11
//! (0=C, 1=C#/Db, 2=D, ... 11=B). Absolute pitches are MIDI note numbers
//! where octave `n` starts at `n * 12`, the same numbering the voicing
//! engine uses for its base octave.

/// Chromatic pitch class, always in 0..12
pub type PitchClass = u8;

/// Highest valid MIDI note number
pub const MIDI_NOTE_MAX: i32 = 127;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Parse a note name (`C`, `F#`, `Bb`) at the start of `s`.
///
/// Returns the pitch class and the number of bytes consumed, or `None`
/// when `s` does not start with a note letter. Only uppercase letters are
/// note names; a lowercase `b` directly after the letter is a flat.
pub fn parse_note_prefix(s: &str) -> Option<(PitchClass, usize)> {
    let mut chars = s.chars();
    let natural: i8 = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let (offset, consumed) = match chars.next() {
        Some('#') => (1, 2),
        Some('b') => (-1, 2),
        _ => (0, 1),
    };

    Some(((natural + offset).rem_euclid(12) as PitchClass, consumed))
}

/// Parse a complete note name, rejecting trailing characters
pub fn parse_note_name(s: &str) -> Option<PitchClass> {
    match parse_note_prefix(s) {
        Some((pc, consumed)) if consumed == s.len() => Some(pc),
        _ => None,
    }
}

/// Display name of a pitch class (sharps for black keys)
pub fn pitch_class_name(pc: PitchClass) -> &'static str {
    SHARP_NAMES[(pc % 12) as usize]
}

/// Display name of an absolute MIDI note, e.g. `60` -> `C5`
pub fn midi_note_name(note: u8) -> String {
    format!("{}{}", pitch_class_name(note % 12), note / 12)
}

/// Transpose a pitch class by any number of semitones
pub fn transpose_pitch_class(pc: PitchClass, semitones: i32) -> PitchClass {
    (pc as i32 + semitones).rem_euclid(12) as PitchClass
}

/// Bring a computed pitch into 0..=127 by whole octaves.
///
/// Folding keeps the pitch class, so a clamped voicing still realizes the
/// same pitch-class set. Distinct inputs may collapse onto one pitch at the
/// edges of the range.
pub fn fold_into_midi_range(pitch: i32) -> u8 {
    let mut p = pitch;
    while p < 0 {
        p += 12;
    }
    while p > MIDI_NOTE_MAX {
        p -= 12;
    }
    p as u8
}
