//! Standard MIDI File encoding
//!
//! Produces format-0, single-track files at [`TICKS_PER_QUARTER`] ticks per
//! quarter note. Container layout and event serialization are delegated to
//! `midly`; this module decides which notes are written, orders the events
//! and computes delta times.

use crate::types::generation::{ChordGenerationData, NoteData};
use crate::types::options::OutputType;
use crate::types::time::{TimeSignature, TICKS_PER_QUARTER};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use thiserror::Error;
use tracing::debug;

/// Largest value a MIDI variable-length delta can hold
const MAX_DELTA: u32 = 0x0FFF_FFFF;

/// Largest tempo meta value (microseconds per quarter note)
const MAX_TEMPO_MICROS: u32 = 0x00FF_FFFF;

/// MIDI clocks per metronome click in the time-signature meta event
const CLOCKS_PER_CLICK: u8 = 24;

/// Notated 32nd notes per MIDI quarter note
const THIRTY_SECONDS_PER_QUARTER: u8 = 8;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("tick {0} is beyond the range of a MIDI delta time")]
    TickOutOfRange(u64),
    #[error("failed to write MIDI data: {0}")]
    Io(#[from] std::io::Error),
}

/// Track-level settings written alongside the notes
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeSettings {
    /// Beats per minute
    pub tempo: u32,
    pub time_signature: TimeSignature,
    /// MIDI channel 0-15; larger values are clamped
    pub channel: u8,
    pub track_name: Option<String>,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            tempo: 120,
            time_signature: TimeSignature::COMMON,
            channel: 0,
            track_name: None,
        }
    }
}

/// Kind of a scheduled note event. Offs sort before ons at the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NoteEventKind {
    Off,
    On,
}

/// A note-on or note-off at an absolute tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub tick: u64,
    pub kind: NoteEventKind,
    pub note: u8,
    pub velocity: u8,
}

/// The fifth above a bass note, clamped to the top of the MIDI range
pub fn fifth_above(bass: u8) -> u8 {
    (bass as u16 + 7).min(127) as u8
}

/// Select the notes an output type writes, one `NoteData` per sounding
/// pitch. Rests and invalid chords contribute nothing.
pub fn collect_notes(
    chords: &[ChordGenerationData],
    output: OutputType,
    velocity: u8,
) -> Vec<NoteData> {
    let velocity = velocity.clamp(1, 127);
    let mut notes = Vec::new();

    for chord in chords.iter().filter(|c| c.is_audible()) {
        let start = chord.start_time_ticks;
        let duration = chord.duration_ticks;
        let mut push = |pitch: u8| notes.push(NoteData::new(pitch, start, duration, velocity));

        match (output, chord.calculated_bass_note) {
            (OutputType::BassOnly, Some(bass)) => push(bass),
            (OutputType::BassAndFifth, Some(bass)) => {
                push(bass);
                push(fifth_above(bass));
            }
            (OutputType::ChordsAndBass, Some(bass)) => {
                push(bass);
                chord.adjusted_voicing.iter().for_each(|n| push(*n));
            }
            (OutputType::ChordsOnly, _) | (OutputType::ChordsAndBass, None) => {
                chord.adjusted_voicing.iter().for_each(|n| push(*n));
            }
            (OutputType::BassOnly, None) | (OutputType::BassAndFifth, None) => {}
        }
    }

    notes
}

/// Expand notes into on/off events in file order.
///
/// Ordering is by tick, then offs before ons, then pitch, so a note that ends
/// exactly where another begins is released before anything is struck.
pub fn note_events(notes: &[NoteData]) -> Vec<NoteEvent> {
    let mut events = Vec::with_capacity(notes.len() * 2);
    for note in notes.iter().filter(|n| n.duration_ticks > 0) {
        let velocity = note.velocity.clamp(1, 127);
        let pitch = note.midi_note.min(127);
        events.push(NoteEvent {
            tick: note.start_time_ticks as u64,
            kind: NoteEventKind::On,
            note: pitch,
            velocity,
        });
        events.push(NoteEvent {
            tick: note.start_time_ticks as u64 + note.duration_ticks as u64,
            kind: NoteEventKind::Off,
            note: pitch,
            velocity: 0,
        });
    }
    events.sort_by_key(|e| (e.tick, e.kind, e.note));
    events
}

/// Encode notes into a Standard MIDI File
pub fn encode(notes: &[NoteData], settings: &EncodeSettings) -> Result<Vec<u8>, EncodeError> {
    let channel = u4::new(settings.channel.min(15));
    let tempo_micros = (60_000_000 / settings.tempo.max(1)).min(MAX_TEMPO_MICROS);
    let meter = settings.time_signature;

    let mut track: Vec<TrackEvent> = Vec::with_capacity(notes.len() * 2 + 4);
    if let Some(name) = &settings.track_name {
        track.push(meta(MetaMessage::TrackName(name.as_bytes())));
    }
    track.push(meta(MetaMessage::Tempo(u24::new(tempo_micros))));
    track.push(meta(MetaMessage::TimeSignature(
        meter.numerator,
        meter.denominator_power(),
        CLOCKS_PER_CLICK,
        THIRTY_SECONDS_PER_QUARTER,
    )));

    let events = note_events(notes);
    let mut cursor = 0u64;
    for event in &events {
        let delta = event.tick - cursor;
        if delta > MAX_DELTA as u64 {
            return Err(EncodeError::TickOutOfRange(event.tick));
        }
        cursor = event.tick;

        let key = u7::new(event.note);
        let message = match event.kind {
            NoteEventKind::On => MidiMessage::NoteOn {
                key,
                vel: u7::new(event.velocity),
            },
            NoteEventKind::Off => MidiMessage::NoteOff {
                key,
                vel: u7::new(0),
            },
        };
        track.push(TrackEvent {
            delta: u28::new(delta as u32),
            kind: TrackEventKind::Midi { channel, message },
        });
    }
    track.push(meta(MetaMessage::EndOfTrack));

    let header = Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER as u16)),
    );
    let mut smf = Smf::new(header);
    smf.tracks.push(track);

    let mut bytes = Vec::new();
    smf.write_std(&mut bytes)?;

    debug!(
        notes = notes.len(),
        events = events.len(),
        bytes = bytes.len(),
        "encoded MIDI file"
    );
    Ok(bytes)
}

fn meta(message: MetaMessage<'_>) -> TrackEvent<'_> {
    TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Absolute tick, on/off, key, velocity for every channel event
    fn decode(bytes: &[u8]) -> Vec<(u64, NoteEventKind, u8, u8)> {
        let smf = Smf::parse(bytes).expect("valid MIDI file");
        assert_eq!(smf.tracks.len(), 1);

        let mut tick = 0u64;
        let mut out = Vec::new();
        for event in &smf.tracks[0] {
            tick += event.delta.as_int() as u64;
            if let TrackEventKind::Midi { message, .. } = event.kind {
                match message {
                    MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        out.push((tick, NoteEventKind::On, key.as_int(), vel.as_int()))
                    }
                    MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                        out.push((tick, NoteEventKind::Off, key.as_int(), 0))
                    }
                    other => panic!("unexpected message {:?}", other),
                }
            }
        }
        out
    }

    fn chord(start: u32, duration: u32, voicing: &[u8], bass: u8) -> ChordGenerationData {
        ChordGenerationData {
            symbol: "X".to_string(),
            is_valid: true,
            is_rest: false,
            start_time_ticks: start,
            duration_ticks: duration,
            pitch_class_set: voicing.iter().map(|n| n % 12).collect::<BTreeSet<_>>(),
            adjusted_voicing: voicing.to_vec(),
            calculated_bass_note: Some(bass),
            error: None,
        }
    }

    #[test]
    fn test_header_bytes() {
        let bytes = encode(&[], &EncodeSettings::default()).unwrap();
        // MThd, length 6, format 0, one track, 128 ticks per quarter
        assert_eq!(
            &bytes[..14],
            &[b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 128]
        );
        assert_eq!(&bytes[14..18], b"MTrk");
    }

    #[test]
    fn test_empty_track_is_valid() {
        let bytes = encode(&[], &EncodeSettings::default()).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(128)));

        let kinds: Vec<_> = smf.tracks[0].iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TrackEventKind::Meta(MetaMessage::Tempo(u24::new(500_000))),
                TrackEventKind::Meta(MetaMessage::TimeSignature(4, 2, 24, 8)),
                TrackEventKind::Meta(MetaMessage::EndOfTrack),
            ]
        );
    }

    #[test]
    fn test_tempo_and_meter_meta() {
        let settings = EncodeSettings {
            tempo: 90,
            time_signature: TimeSignature::new(6, 8),
            track_name: Some("Progression".to_string()),
            ..EncodeSettings::default()
        };
        let bytes = encode(&[], &settings).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let kinds: Vec<_> = smf.tracks[0].iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds[0],
            TrackEventKind::Meta(MetaMessage::TrackName(b"Progression"))
        );
        assert_eq!(
            kinds[1],
            TrackEventKind::Meta(MetaMessage::Tempo(u24::new(666_666)))
        );
        assert_eq!(
            kinds[2],
            TrackEventKind::Meta(MetaMessage::TimeSignature(6, 3, 24, 8))
        );
    }

    #[test]
    fn test_delta_times() {
        let notes = [
            NoteData::new(60, 0, 128, 100),
            NoteData::new(62, 256, 64, 100),
        ];
        let bytes = encode(&notes, &EncodeSettings::default()).unwrap();
        let smf = Smf::parse(&bytes).unwrap();

        let deltas: Vec<u32> = smf.tracks[0]
            .iter()
            .filter(|e| matches!(e.kind, TrackEventKind::Midi { .. }))
            .map(|e| e.delta.as_int())
            .collect();
        // on@0, off@128, on@256, off@320
        assert_eq!(deltas, vec![0, 128, 128, 64]);
    }

    #[test]
    fn test_off_before_on_at_shared_tick() {
        // C major for one bar, then A minor starting exactly when C ends
        let notes = [
            NoteData::new(60, 0, 512, 100),
            NoteData::new(64, 0, 512, 100),
            NoteData::new(67, 0, 512, 100),
            NoteData::new(57, 512, 512, 100),
            NoteData::new(60, 512, 512, 100),
            NoteData::new(64, 512, 512, 100),
        ];
        let bytes = encode(&notes, &EncodeSettings::default()).unwrap();
        let decoded = decode(&bytes);

        let at_512: Vec<_> = decoded.iter().filter(|e| e.0 == 512).collect();
        assert_eq!(at_512.len(), 6);
        let first_on = at_512
            .iter()
            .position(|e| e.1 == NoteEventKind::On)
            .unwrap();
        assert_eq!(first_on, 3, "all three offs precede the ons: {:?}", at_512);
        assert!(at_512[..3].iter().all(|e| e.1 == NoteEventKind::Off));

        // Re-struck common tones are released before they sound again
        let c_events: Vec<_> = decoded.iter().filter(|e| e.2 == 60 && e.0 == 512).collect();
        assert_eq!(c_events[0].1, NoteEventKind::Off);
        assert_eq!(c_events[1].1, NoteEventKind::On);
    }

    #[test]
    fn test_ghost_note_and_accent_overlap() {
        // A ghost note ends on the same tick an accent on the same key begins,
        // and an overlapping accent on another key is already sounding
        let notes = [
            NoteData::new(38, 0, 64, 20),
            NoteData::new(38, 64, 64, 127),
            NoteData::new(42, 32, 64, 110),
            NoteData::new(42, 96, 32, 25),
        ];
        let decoded = decode(&encode(&notes, &EncodeSettings::default()).unwrap());
        assert_eq!(
            decoded,
            vec![
                (0, NoteEventKind::On, 38, 20),
                (32, NoteEventKind::On, 42, 110),
                (64, NoteEventKind::Off, 38, 0),
                (64, NoteEventKind::On, 38, 127),
                (96, NoteEventKind::Off, 42, 0),
                (96, NoteEventKind::On, 42, 25),
                (128, NoteEventKind::Off, 38, 0),
                (128, NoteEventKind::Off, 42, 0),
            ]
        );
    }

    #[test]
    fn test_velocity_and_channel_clamped() {
        let notes = [NoteData::new(60, 0, 10, 0), NoteData::new(61, 0, 10, 200)];
        let settings = EncodeSettings {
            channel: 20,
            ..EncodeSettings::default()
        };
        let bytes = encode(&notes, &settings).unwrap();
        let smf = Smf::parse(&bytes).unwrap();

        let ons: Vec<(u8, u8, u8)> = smf.tracks[0]
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn { key, vel },
                } => Some((channel.as_int(), key.as_int(), vel.as_int())),
                _ => None,
            })
            .collect();
        assert_eq!(ons, vec![(15, 60, 1), (15, 61, 127)]);
    }

    #[test]
    fn test_collect_notes_by_output_type() {
        let chords = [chord(0, 512, &[60, 64, 67], 48)];

        let pitches = |output| -> Vec<u8> {
            collect_notes(&chords, output, 100)
                .iter()
                .map(|n| n.midi_note)
                .collect()
        };
        assert_eq!(pitches(OutputType::ChordsOnly), vec![60, 64, 67]);
        assert_eq!(pitches(OutputType::ChordsAndBass), vec![48, 60, 64, 67]);
        assert_eq!(pitches(OutputType::BassOnly), vec![48]);
        assert_eq!(pitches(OutputType::BassAndFifth), vec![48, 55]);
    }

    #[test]
    fn test_collect_notes_skips_rests_and_invalid() {
        let mut rest = chord(512, 512, &[], 0);
        rest.is_rest = true;
        rest.calculated_bass_note = None;
        let mut invalid = chord(1024, 512, &[], 0);
        invalid.is_valid = false;
        invalid.calculated_bass_note = None;

        let chords = [chord(0, 512, &[60, 64, 67], 48), rest, invalid];
        let notes = collect_notes(&chords, OutputType::ChordsAndBass, 90);
        assert_eq!(notes.len(), 4);
        assert!(notes.iter().all(|n| n.start_time_ticks == 0 && n.velocity == 90));
    }

    #[test]
    fn test_fifth_clamps_at_top_of_range() {
        assert_eq!(fifth_above(48), 55);
        assert_eq!(fifth_above(120), 127);
        assert_eq!(fifth_above(125), 127);
        assert_eq!(fifth_above(127), 127);

        let chords = [chord(0, 128, &[127], 124)];
        let notes = collect_notes(&chords, OutputType::BassAndFifth, 100);
        let pitches: Vec<u8> = notes.iter().map(|n| n.midi_note).collect();
        assert_eq!(pitches, vec![124, 127]);
    }

    #[test]
    fn test_filter_applies_before_deltas() {
        // Bass-only output of two chords: deltas are measured between bass
        // events, not between the dropped chord tones
        let chords = [
            chord(0, 512, &[60, 64, 67], 48),
            chord(512, 512, &[57, 60, 64], 45),
        ];
        let notes = collect_notes(&chords, OutputType::BassOnly, 100);
        let decoded = decode(&encode(&notes, &EncodeSettings::default()).unwrap());
        assert_eq!(
            decoded,
            vec![
                (0, NoteEventKind::On, 48, 100),
                (512, NoteEventKind::Off, 48, 0),
                (512, NoteEventKind::On, 45, 100),
                (1024, NoteEventKind::Off, 45, 0),
            ]
        );
    }

    #[test]
    fn test_deterministic_output() {
        let notes = [
            NoteData::new(67, 0, 512, 100),
            NoteData::new(60, 0, 512, 100),
            NoteData::new(64, 0, 512, 100),
        ];
        let settings = EncodeSettings::default();
        let a = encode(&notes, &settings).unwrap();
        let mut reversed = notes;
        reversed.reverse();
        let b = encode(&reversed, &settings).unwrap();
        assert_eq!(a, b);
    }
}
