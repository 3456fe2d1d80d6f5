//! Chord resolution: symbol parts to pitch classes and bass

use crate::parser::progression::ChordSymbol;
use crate::types::note::{pitch_class_name, transpose_pitch_class, PitchClass};
use crate::types::quality::intervals_for;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Why a single chord could not be resolved. Never fatal to a progression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("'{0}' does not start with a note name (A-G)")]
    MissingRoot(String),
    #[error("unknown chord quality '{0}'")]
    UnknownQuality(String),
}

/// A chord reduced to pitch classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    root: PitchClass,
    /// Chord tones in stacking order, root first, no duplicates
    pitch_classes: Vec<PitchClass>,
    bass: PitchClass,
}

impl Chord {
    /// Resolve a parsed symbol, shifting root and slash bass by `transpose`
    /// semitones first
    pub fn resolve(symbol: &ChordSymbol, transpose: i32) -> Result<Self, ResolveError> {
        let root = symbol
            .root
            .ok_or_else(|| ResolveError::MissingRoot(symbol.quality.clone()))?;
        let intervals = intervals_for(&symbol.quality)
            .ok_or_else(|| ResolveError::UnknownQuality(symbol.quality.clone()))?;

        let root = transpose_pitch_class(root, transpose);
        let bass = symbol
            .bass
            .map(|b| transpose_pitch_class(b, transpose))
            .unwrap_or(root);

        Ok(Self::from_intervals(root, intervals, bass))
    }

    /// Build a chord from a root and intervals above it
    pub fn from_intervals(root: PitchClass, intervals: &[u8], bass: PitchClass) -> Self {
        let mut pitch_classes: Vec<PitchClass> = Vec::with_capacity(intervals.len());
        for interval in intervals {
            let pc = transpose_pitch_class(root, *interval as i32);
            if !pitch_classes.contains(&pc) {
                pitch_classes.push(pc);
            }
        }
        // The table always starts at 0, but a hand-built chord may not
        if pitch_classes.first() != Some(&root) {
            pitch_classes.retain(|pc| *pc != root);
            pitch_classes.insert(0, root);
        }

        Chord {
            root,
            pitch_classes,
            bass: bass % 12,
        }
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    /// Bass pitch class: the slash bass if given, else the root
    pub fn bass(&self) -> PitchClass {
        self.bass
    }

    pub fn has_slash_bass(&self) -> bool {
        self.bass != self.root
    }

    /// Chord tones in stacking order (root first)
    pub fn pitch_classes(&self) -> &[PitchClass] {
        &self.pitch_classes
    }

    pub fn pitch_class_set(&self) -> BTreeSet<PitchClass> {
        self.pitch_classes.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.pitch_classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitch_classes.is_empty()
    }

    /// Whether the chord has a tone `semitones` above the root (mod 12)
    pub fn contains_interval(&self, semitones: u8) -> bool {
        self.pitch_classes
            .contains(&transpose_pitch_class(self.root, semitones as i32))
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .pitch_classes
            .iter()
            .map(|pc| pitch_class_name(*pc))
            .collect();
        write!(f, "[{}]", names.join(", "))?;
        if self.has_slash_bass() {
            write!(f, "/{}", pitch_class_name(self.bass))?;
        }
        Ok(())
    }
}
