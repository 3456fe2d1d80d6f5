//! # Chordsmith
//!
//! Command-line front end for `chordsmith-core`: an interactive REPL for
//! typing chord progressions and saving them as MIDI files, one-shot
//! conversion of progression files, and a watch mode that regenerates a
//! file's MIDI output every time it is saved.
//!
//! ## Modules
//!
//! - `commands`: REPL command registry, session state and handlers.
//! - `convert`: Progression files to MIDI files.
//! - `repl`: The Read-Eval-Print Loop and its file watcher.

pub mod commands;
pub mod convert;
pub mod repl;

// Re-export commonly used types and functions for convenience
pub use crate::convert::{convert_file, progression_from_text, read_progression};
pub use chordsmith_core::{generate, MidiGenerationOptions, MidiGenerationResult};
