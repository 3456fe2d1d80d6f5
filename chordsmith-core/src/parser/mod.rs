// chordsmith-core/src/parser/mod.rs

pub mod duration;
pub mod error;
pub mod progression;

pub use duration::{parse_duration, NAMED_DURATIONS};
pub use error::{DurationError, ParseError};
pub use progression::{
    normalize, parse_chord_symbol, parse_progression, ChordSymbol, EntryKind, ProgressionEntry,
};
