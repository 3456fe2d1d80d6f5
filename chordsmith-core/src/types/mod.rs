// chordsmith-core/src/types/mod.rs

pub mod chord;
pub mod generation;
pub mod note;
pub mod options;
pub mod quality;
pub mod time;
pub mod voice_leading;

pub use chord::{Chord, ResolveError};
pub use generation::{ChordGenerationData, MidiGenerationResult, NoteData};
pub use note::PitchClass;
pub use options::{MidiGenerationOptions, OutputType, VoicingStrategy};
pub use quality::{intervals_for, CHORD_QUALITIES};
pub use time::{TimeSignature, TICKS_PER_QUARTER};
pub use voice_leading::{voice_chord, voice_sequence, Voicing};
