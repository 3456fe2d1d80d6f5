//! Progression to MIDI, end to end
//!
//! [`generate`] is a pure function of its options: parse, resolve each
//! chord, voice it against the chord before, then encode. Nothing carries
//! over between calls.

use crate::midi::encoder::{collect_notes, encode, EncodeError, EncodeSettings};
use crate::parser::error::ParseError;
use crate::parser::progression::{parse_progression, EntryKind};
use crate::types::chord::Chord;
use crate::types::generation::{ChordGenerationData, MidiGenerationResult};
use crate::types::options::MidiGenerationOptions;
use crate::types::time::MAX_TICKS;
use crate::types::voice_leading::voice_chord;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};

/// Chord symbols used to build a default file name
const NAME_CHORDS: usize = 4;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("progression is longer than {} ticks", MAX_TICKS)]
    TooLong,
    #[error("MIDI encoding failed: {0}")]
    Encode(#[from] EncodeError),
}

/// Generate a MIDI file from a progression
pub fn generate(options: &MidiGenerationOptions) -> Result<MidiGenerationResult, GenerateError> {
    let chord_details = resolve_progression(options)?;
    let notes = collect_notes(&chord_details, options.output_type, options.velocity);
    let final_file_name = final_file_name(options, &chord_details);

    let settings = EncodeSettings {
        tempo: options.tempo,
        time_signature: options.time_signature,
        channel: options.channel,
        track_name: Some(final_file_name.trim_end_matches(".mid").to_string()),
    };
    let midi_bytes = encode(&notes, &settings)?;

    debug!(
        file = %final_file_name,
        chords = chord_details.len(),
        notes = notes.len(),
        "generated progression"
    );

    Ok(MidiGenerationResult {
        midi_bytes,
        final_file_name,
        notes,
        chord_details,
    })
}

/// Parse, resolve and voice a progression without encoding it.
///
/// Chords that fail to resolve come back with `is_valid == false` and keep
/// their time slot. Rests and invalid chords do not disturb the voicing that
/// the next chord leads from.
pub fn resolve_progression(
    options: &MidiGenerationOptions,
) -> Result<Vec<ChordGenerationData>, GenerateError> {
    options.validate().map_err(GenerateError::InvalidOptions)?;

    let entries = parse_progression(
        &options.progression,
        &options.chord_duration,
        options.time_signature,
    )?;
    let transpose = options.transpose as i32;

    let mut details = Vec::with_capacity(entries.len());
    let mut cursor: u32 = 0;
    let mut previous: Option<Vec<u8>> = None;

    for entry in entries {
        let start = cursor;
        cursor = cursor
            .checked_add(entry.duration_ticks)
            .filter(|end| *end <= MAX_TICKS)
            .ok_or(GenerateError::TooLong)?;

        let mut data = ChordGenerationData {
            symbol: entry.symbol,
            is_valid: true,
            is_rest: false,
            start_time_ticks: start,
            duration_ticks: entry.duration_ticks,
            pitch_class_set: BTreeSet::new(),
            adjusted_voicing: Vec::new(),
            calculated_bass_note: None,
            error: None,
        };

        match entry.kind {
            EntryKind::Rest => data.is_rest = true,
            EntryKind::Chord(symbol) => match Chord::resolve(&symbol, transpose) {
                Ok(chord) => {
                    let voicing = voice_chord(
                        &chord,
                        options.voicing,
                        options.base_octave,
                        previous.as_deref(),
                    );
                    data.pitch_class_set = chord.pitch_class_set();
                    data.calculated_bass_note = Some(voicing.bass);
                    data.adjusted_voicing = voicing.notes.clone();
                    previous = Some(voicing.notes);
                }
                Err(e) => {
                    warn!(symbol = %data.symbol, error = %e, "skipping chord");
                    data.is_valid = false;
                    data.error = Some(e.to_string());
                }
            },
        }
        details.push(data);
    }

    Ok(details)
}

/// The explicit file name with `.mid` appended when missing, or a name built
/// from the first few chords and the output type
pub fn final_file_name(options: &MidiGenerationOptions, details: &[ChordGenerationData]) -> String {
    if let Some(name) = options.file_name.as_deref().map(str::trim) {
        if !name.is_empty() {
            return if name.to_lowercase().ends_with(".mid") {
                name.to_string()
            } else {
                format!("{}.mid", name)
            };
        }
    }

    let chords: Vec<&str> = details
        .iter()
        .filter(|d| !d.is_rest)
        .take(NAME_CHORDS)
        .map(|d| d.symbol.as_str())
        .collect();
    let stem = if chords.is_empty() {
        "progression".to_string()
    } else {
        sanitize(&chords.join("-"))
    };
    format!("{}_{}.mid", stem, options.output_type.slug())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '#' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::options::{OutputType, VoicingStrategy};

    #[test]
    fn test_resolve_timing() {
        let details =
            resolve_progression(&MidiGenerationOptions::new("C:0.5 G:h Am:T128 F")).unwrap();
        let slots: Vec<(u32, u32)> = details
            .iter()
            .map(|d| (d.start_time_ticks, d.duration_ticks))
            .collect();
        assert_eq!(slots, vec![(0, 256), (256, 256), (512, 128), (640, 512)]);
    }

    #[test]
    fn test_default_register() {
        let details = resolve_progression(&MidiGenerationOptions::new("C")).unwrap();
        assert_eq!(details[0].adjusted_voicing, vec![48, 52, 55]);
        assert_eq!(details[0].calculated_bass_note, Some(36));
    }

    #[test]
    fn test_invalid_chord_keeps_slot() {
        let details = resolve_progression(&MidiGenerationOptions::new("C Cxyz G")).unwrap();
        assert_eq!(details.len(), 3);
        assert!(!details[1].is_valid);
        assert_eq!(details[1].start_time_ticks, 512);
        assert!(details[1].adjusted_voicing.is_empty());
        assert_eq!(
            details[1].error.as_deref(),
            Some("unknown chord quality 'xyz'")
        );
        assert_eq!(details[2].start_time_ticks, 1024);
    }

    #[test]
    fn test_smooth_leads_across_rest() {
        let options = MidiGenerationOptions::new("C:1 R:1 Am:1").with_voicing(VoicingStrategy::Smooth);
        let details = resolve_progression(&options).unwrap();
        assert!(details[1].is_rest);
        assert_eq!(details[0].adjusted_voicing, vec![48, 52, 55]);
        // Am leads from the C voicing, not from the silence
        assert_eq!(details[2].adjusted_voicing, vec![48, 52, 57]);
    }

    #[test]
    fn test_transpose() {
        let options = MidiGenerationOptions::new("C/G").with_transpose(2);
        let details = resolve_progression(&options).unwrap();
        assert_eq!(details[0].pitch_class_set, [2, 6, 9].into_iter().collect());
        assert_eq!(details[0].calculated_bass_note.map(|b| b % 12), Some(9));
    }

    #[test]
    fn test_invalid_options() {
        let err = generate(&MidiGenerationOptions::new("C").with_tempo(0)).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidOptions(_)));
        // 60_000_000 / 3 does not fit the tempo meta event
        let err = generate(&MidiGenerationOptions::new("C").with_tempo(3)).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidOptions(_)));
        assert!(generate(&MidiGenerationOptions::new("C").with_tempo(4)).is_ok());
    }

    #[test]
    fn test_overlong_duration_names_token() {
        let err = generate(&MidiGenerationOptions::new("C:T300000000")).unwrap_err();
        match err {
            GenerateError::Parse(ParseError::InvalidDuration { token, .. }) => {
                assert_eq!(token, "C:T300000000")
            }
            other => panic!("expected a duration error, got {:?}", other),
        }
    }

    #[test]
    fn test_progression_past_tick_limit() {
        let err = resolve_progression(&MidiGenerationOptions::new(
            "R:T200000000 R:T200000000 C:1",
        ))
        .unwrap_err();
        assert!(matches!(err, GenerateError::TooLong));

        let details =
            resolve_progression(&MidiGenerationOptions::new("R:T268435000 C:T455")).unwrap();
        assert_eq!(details[1].start_time_ticks + details[1].duration_ticks, MAX_TICKS);
    }

    #[test]
    fn test_parse_error_aborts() {
        let err = generate(&MidiGenerationOptions::new("C R G")).unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));
        assert!(err.to_string().contains("'R'"), "{}", err);
    }

    #[test]
    fn test_file_names() {
        let options = MidiGenerationOptions::new("C Am/E F G C");
        let details = resolve_progression(&options).unwrap();
        assert_eq!(
            final_file_name(&options, &details),
            "C-Am_E-F-G_chords.mid"
        );

        let bass = options.clone().with_output_type(OutputType::BassAndFifth);
        assert_eq!(final_file_name(&bass, &details), "C-Am_E-F-G_bass_fifth.mid");

        let named = options.clone().with_file_name("song");
        assert_eq!(final_file_name(&named, &details), "song.mid");
        let named = options.with_file_name("song.MID");
        assert_eq!(final_file_name(&named, &details), "song.MID");

        let rests = MidiGenerationOptions::new("R:1");
        let details = resolve_progression(&rests).unwrap();
        assert_eq!(final_file_name(&rests, &details), "progression_chords.mid");
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("F#m7-Bb+"), "F#m7-Bb_");
        assert_eq!(sanitize("C°7-Bø"), "C_7-B_");
    }
}
