//! Generation output types

use crate::types::note::{midi_note_name, pitch_class_name, PitchClass};
use std::collections::BTreeSet;
use std::fmt;

/// Resolved state of one progression entry
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ChordGenerationData {
    /// Symbol as written in the progression (`R` for rests)
    pub symbol: String,
    pub is_valid: bool,
    pub is_rest: bool,
    pub start_time_ticks: u32,
    pub duration_ticks: u32,
    pub pitch_class_set: BTreeSet<PitchClass>,
    /// Absolute chord pitches, ascending
    pub adjusted_voicing: Vec<u8>,
    pub calculated_bass_note: Option<u8>,
    /// Why the chord could not be resolved
    pub error: Option<String>,
}

impl ChordGenerationData {
    pub fn end_time_ticks(&self) -> u32 {
        self.start_time_ticks + self.duration_ticks
    }

    /// Whether this entry sounds at all
    pub fn is_audible(&self) -> bool {
        self.is_valid && !self.is_rest
    }
}

impl fmt::Display for ChordGenerationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @{}+{}",
            self.symbol, self.start_time_ticks, self.duration_ticks
        )?;

        if self.is_rest {
            return write!(f, " (rest)");
        }
        if let Some(error) = &self.error {
            return write!(f, " invalid: {}", error);
        }

        let pcs: Vec<&str> = self
            .pitch_class_set
            .iter()
            .map(|pc| pitch_class_name(*pc))
            .collect();
        let voicing: Vec<String> = self
            .adjusted_voicing
            .iter()
            .map(|n| midi_note_name(*n))
            .collect();
        write!(f, " {{{}}} [{}]", pcs.join(", "), voicing.join(" "))?;

        if let Some(bass) = self.calculated_bass_note {
            write!(f, " bass {}", midi_note_name(bass))?;
        }
        Ok(())
    }
}

/// One playable note event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NoteData {
    pub midi_note: u8,
    pub start_time_ticks: u32,
    pub duration_ticks: u32,
    pub velocity: u8,
}

impl NoteData {
    pub fn new(midi_note: u8, start_time_ticks: u32, duration_ticks: u32, velocity: u8) -> Self {
        Self {
            midi_note,
            start_time_ticks,
            duration_ticks,
            velocity,
        }
    }

    pub fn end_time_ticks(&self) -> u32 {
        self.start_time_ticks + self.duration_ticks
    }
}

/// Everything a front end needs after one generation call
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MidiGenerationResult {
    /// Standard MIDI File bytes
    pub midi_bytes: Vec<u8>,
    pub final_file_name: String,
    /// Notes written to the file, in start order (piano roll input)
    pub notes: Vec<NoteData>,
    pub chord_details: Vec<ChordGenerationData>,
}

impl MidiGenerationResult {
    /// Total length of the progression in ticks
    pub fn total_ticks(&self) -> u32 {
        self.chord_details
            .last()
            .map(|c| c.end_time_ticks())
            .unwrap_or(0)
    }

    pub fn invalid_chords(&self) -> impl Iterator<Item = &ChordGenerationData> {
        self.chord_details.iter().filter(|c| !c.is_valid)
    }
}
