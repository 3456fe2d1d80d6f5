// chordsmith-core/src/midi/mod.rs

pub mod encoder;

pub use encoder::{collect_notes, encode, fifth_above, EncodeError, EncodeSettings};
