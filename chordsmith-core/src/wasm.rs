//! WASM bindings for chordsmith-core
//!
//! Provides JavaScript-accessible functions for checking progressions as
//! they are typed and generating MIDI files in the browser.

#[cfg(feature = "wasm")]
use crate::generate::{generate, resolve_progression};
#[cfg(feature = "wasm")]
use crate::types::options::MidiGenerationOptions;
#[cfg(feature = "wasm")]
use crate::types::quality::intervals_for;
#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

use crate::parser::progression::parse_progression;
use crate::types::chord::Chord;
use crate::types::options::{OutputType, VoicingStrategy};
use crate::types::quality::CHORD_QUALITIES;
use crate::types::time::TimeSignature;

/// A problem found while checking a progression in the editor
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionIssue {
    pub message: String,
    /// Offending token, when the issue belongs to one
    pub token: Option<String>,
    /// Fatal issues stop generation; the rest only silence one chord
    pub fatal: bool,
}

/// Result of checking a progression without generating it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionCheck {
    pub success: bool,
    pub chord_count: usize,
    pub issues: Vec<ProgressionIssue>,
}

/// Parse and resolve a progression, collecting every problem.
///
/// Unlike generation this keeps going past unknown chords so an editor can
/// underline all of them at once.
pub fn check_progression(
    input: &str,
    default_duration: &str,
    meter: TimeSignature,
) -> ProgressionCheck {
    let entries = match parse_progression(input, default_duration, meter) {
        Ok(entries) => entries,
        Err(e) => {
            return ProgressionCheck {
                success: false,
                chord_count: 0,
                issues: vec![ProgressionIssue {
                    message: e.to_string(),
                    token: e.token().map(str::to_string),
                    fatal: true,
                }],
            }
        }
    };

    let issues: Vec<ProgressionIssue> = entries
        .iter()
        .filter_map(|entry| {
            let symbol = entry.chord()?;
            let err = Chord::resolve(symbol, 0).err()?;
            Some(ProgressionIssue {
                message: err.to_string(),
                token: Some(entry.symbol.clone()),
                fatal: false,
            })
        })
        .collect();

    ProgressionCheck {
        success: issues.is_empty(),
        chord_count: entries.iter().filter(|e| !e.is_rest()).count(),
        issues,
    }
}

/// One vocabulary entry (JS-serializable)
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityItemJS {
    pub token: String,
    pub intervals: Vec<u8>,
}

pub fn quality_items() -> Vec<QualityItemJS> {
    CHORD_QUALITIES
        .iter()
        .map(|(token, intervals)| QualityItemJS {
            token: token.to_string(),
            intervals: intervals.to_vec(),
        })
        .collect()
}

/// Names accepted for voicing strategies and output types, for dropdowns
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionNamesJS {
    pub voicings: Vec<String>,
    pub output_types: Vec<String>,
}

pub fn option_names() -> OptionNamesJS {
    OptionNamesJS {
        voicings: VoicingStrategy::ALL
            .iter()
            .map(|v| v.name().to_string())
            .collect(),
        output_types: OutputType::ALL.iter().map(|o| o.name().to_string()).collect(),
    }
}

// ============================================================================
// WASM Bindings
// ============================================================================

#[cfg(feature = "wasm")]
fn options_from_js(options: JsValue) -> Result<MidiGenerationOptions, JsValue> {
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("invalid options: {}", e)))
}

/// Full generation: bytes, file name, piano-roll notes and chord details
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn generate_midi(options: JsValue) -> Result<JsValue, JsValue> {
    let options = options_from_js(options)?;
    let result = generate(&options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Just the Standard MIDI File, ready for a `Blob`
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn midi_bytes(options: JsValue) -> Result<js_sys::Uint8Array, JsValue> {
    let options = options_from_js(options)?;
    let result = generate(&options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(js_sys::Uint8Array::from(result.midi_bytes.as_slice()))
}

/// Chord details without encoding, for audition buttons
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn chord_details(options: JsValue) -> Result<JsValue, JsValue> {
    let options = options_from_js(options)?;
    let details = resolve_progression(&options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&details).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn check(input: &str, default_duration: &str) -> JsValue {
    let check = check_progression(input, default_duration, TimeSignature::COMMON);
    serde_wasm_bindgen::to_value(&check).unwrap_or(JsValue::NULL)
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn get_qualities() -> JsValue {
    serde_wasm_bindgen::to_value(&quality_items()).unwrap_or(JsValue::NULL)
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn get_option_names() -> JsValue {
    serde_wasm_bindgen::to_value(&option_names()).unwrap_or(JsValue::NULL)
}

/// Intervals for a quality token, or null when unknown
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn quality_intervals(token: &str) -> JsValue {
    match intervals_for(token) {
        Some(intervals) => serde_wasm_bindgen::to_value(intervals).unwrap_or(JsValue::NULL),
        None => JsValue::NULL,
    }
}
