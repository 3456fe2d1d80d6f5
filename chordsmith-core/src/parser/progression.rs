//! Progression text parser
//!
//! Grammar (after separator normalization):
//!
//! ```text
//! progression := token (' ' token)*
//! token       := symbol (':' duration)?
//! symbol      := 'R' | root quality ('/' note)?
//! root, note  := [A-G] ('#' | 'b')?
//! ```
//!
//! Separators `,` `|` `->` and a standalone `-` are all equivalent to a space.

use crate::parser::duration::parse_duration;
use crate::parser::error::ParseError;
use crate::types::note::{parse_note_name, parse_note_prefix, PitchClass};
use crate::types::time::TimeSignature;
use tracing::trace;

/// Characters allowed inside a chord symbol besides ASCII letters and digits
const SYMBOL_PUNCTUATION: &str = "#+°ø^()-/";

/// A chord symbol split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChordSymbol {
    /// `None` when the symbol does not start with a note name
    pub root: Option<PitchClass>,
    /// Quality token; the whole symbol when there is no root
    pub quality: String,
    /// Slash bass
    pub bass: Option<PitchClass>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryKind {
    Chord(ChordSymbol),
    Rest,
}

/// One parsed progression token
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionEntry {
    /// Symbol text without the duration suffix
    pub symbol: String,
    pub kind: EntryKind,
    /// Always greater than zero
    pub duration_ticks: u32,
}

impl ProgressionEntry {
    pub fn is_rest(&self) -> bool {
        matches!(self.kind, EntryKind::Rest)
    }

    pub fn chord(&self) -> Option<&ChordSymbol> {
        match &self.kind {
            EntryKind::Chord(chord) => Some(chord),
            EntryKind::Rest => None,
        }
    }

    pub fn root_pitch_class(&self) -> Option<PitchClass> {
        self.chord().and_then(|c| c.root)
    }

    pub fn quality(&self) -> Option<&str> {
        self.chord().map(|c| c.quality.as_str())
    }

    pub fn explicit_bass_pitch_class(&self) -> Option<PitchClass> {
        self.chord().and_then(|c| c.bass)
    }
}

/// Collapse every separator form to a single space
pub fn normalize(input: &str) -> String {
    input
        .replace("->", " ")
        .replace([',', '|'], " ")
        .split_whitespace()
        .filter(|word| *word != "-")
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a progression, resolving every duration to ticks.
///
/// `default_duration` applies to chord tokens without a `:duration` suffix.
/// Any malformed token fails the whole parse.
pub fn parse_progression(
    input: &str,
    default_duration: &str,
    meter: TimeSignature,
) -> Result<Vec<ProgressionEntry>, ParseError> {
    let default_ticks =
        parse_duration(default_duration, meter).map_err(|e| ParseError::InvalidDefaultDuration {
            duration: default_duration.to_string(),
            reason: e.to_string(),
        })?;

    let normalized = normalize(input);
    if normalized.is_empty() {
        return Err(ParseError::Empty);
    }

    let entries = normalized
        .split(' ')
        .map(|token| parse_token(token, default_ticks, meter))
        .collect::<Result<Vec<_>, _>>()?;

    trace!(count = entries.len(), "parsed progression");
    Ok(entries)
}

fn parse_token(
    token: &str,
    default_ticks: u32,
    meter: TimeSignature,
) -> Result<ProgressionEntry, ParseError> {
    let mut parts = token.split(':');
    let symbol = parts.next().unwrap_or_default();
    let duration = parts.next();
    if parts.next().is_some() {
        return Err(ParseError::malformed(token, "more than one ':'"));
    }
    if symbol.is_empty() {
        return Err(ParseError::malformed(token, "missing chord symbol"));
    }

    let duration_ticks = match duration {
        Some(text) => parse_duration(text, meter).map_err(|e| ParseError::duration(token, e))?,
        None if symbol == "R" => {
            return Err(ParseError::RestWithoutDuration {
                token: token.to_string(),
            })
        }
        None => default_ticks,
    };

    let kind = if symbol == "R" {
        EntryKind::Rest
    } else {
        EntryKind::Chord(parse_chord_symbol(token, symbol)?)
    };

    Ok(ProgressionEntry {
        symbol: symbol.to_string(),
        kind,
        duration_ticks,
    })
}

/// Split a symbol into root, quality and slash bass.
///
/// Only the structure is checked here; whether the quality exists is decided
/// later, per chord, so an unknown chord does not sink the whole progression.
pub fn parse_chord_symbol(token: &str, symbol: &str) -> Result<ChordSymbol, ParseError> {
    if let Some(bad) = symbol
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !SYMBOL_PUNCTUATION.contains(*c))
    {
        return Err(ParseError::malformed(
            token,
            format!("unexpected character '{}'", bad),
        ));
    }

    let (head, bass) = match symbol.split_once('/') {
        None => (symbol, None),
        Some((head, bass_text)) => {
            if bass_text.contains('/') {
                return Err(ParseError::malformed(token, "more than one '/'"));
            }
            if head.is_empty() {
                return Err(ParseError::malformed(token, "missing chord before '/'"));
            }
            let bass = parse_note_name(bass_text).ok_or_else(|| {
                ParseError::malformed(token, format!("invalid bass note '{}'", bass_text))
            })?;
            (head, Some(bass))
        }
    };

    let symbol = match parse_note_prefix(head) {
        Some((root, consumed)) => ChordSymbol {
            root: Some(root),
            quality: head[consumed..].to_string(),
            bass,
        },
        None => ChordSymbol {
            root: None,
            quality: head.to_string(),
            bass,
        },
    };
    Ok(symbol)
}
