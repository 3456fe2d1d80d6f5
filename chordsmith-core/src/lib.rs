//! # Chordsmith Core
//!
//! WASM-compatible engine that turns chord progressions into Standard MIDI
//! Files. No audio, file system or terminal dependencies.
//!
//! ## Features
//!
//! - **serde**: Enable JSON serialization for web interop
//! - **wasm**: Enable WASM bindings via wasm-bindgen
//!
//! ## Example
//!
//! ```ignore
//! use chordsmith_core::{generate, MidiGenerationOptions, VoicingStrategy};
//!
//! let options = MidiGenerationOptions::new("C Am F G").with_voicing(VoicingStrategy::Smooth);
//! let result = generate(&options)?;
//! std::fs::write(&result.final_file_name, &result.midi_bytes)?;
//! ```

pub mod generate;
pub mod midi;
pub mod parser;
pub mod types;
pub mod wasm;

// Re-export commonly used types
pub use generate::{final_file_name, generate, resolve_progression, GenerateError};
pub use parser::{parse_progression, ParseError};
pub use types::{
    Chord, ChordGenerationData, MidiGenerationOptions, MidiGenerationResult, NoteData,
    OutputType, TimeSignature, VoicingStrategy,
};

pub use wasm::{check_progression, ProgressionCheck, ProgressionIssue};
