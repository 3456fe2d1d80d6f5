//! Generation commands (gen, save, details, notes, json)

use crate::commands::{CommandContext, CommandResult};
use chordsmith_core::types::note::midi_note_name;
use chordsmith_core::{ChordGenerationData, MidiGenerationResult, TimeSignature};
use colored::*;
use std::path::{Path, PathBuf};

/// Handle `gen <progression>`; bare progressions land here too
pub fn cmd_gen(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: gen <progression>, e.g. gen C Am F G".to_string());
    }
    ctx.options.progression = args.to_string();
    let meter = ctx.options.time_signature;
    match ctx.generate() {
        Ok(result) => CommandResult::Message(summary(result, meter)),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `save [path]`
pub fn cmd_save(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let result = match ctx.current() {
        Ok(result) => result,
        Err(e) => return CommandResult::Error(e.to_string()),
    };
    let path = save_path(args, &result.final_file_name);
    match std::fs::write(&path, &result.midi_bytes) {
        Ok(()) => CommandResult::Message(format!(
            "💾 Saved {} ({} bytes)",
            path.display().to_string().bright_green(),
            result.midi_bytes.len()
        )),
        Err(e) => CommandResult::Error(format!("Failed to write {}: {}", path.display(), e)),
    }
}

/// Handle `details`: one line per chord
pub fn cmd_details(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.current() {
        Ok(result) => CommandResult::Message(details_table(&result.chord_details)),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `notes`: the flattened note list
pub fn cmd_notes(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.current() {
        Ok(result) if result.notes.is_empty() => {
            CommandResult::Message("No notes (every chord is a rest or invalid)".yellow().to_string())
        }
        Ok(result) => {
            let mut output = format!("{}\n", "🎹 Notes:".bold());
            for note in &result.notes {
                output.push_str(&format!(
                    "  {:>6} +{:<5} {:<4} vel {}\n",
                    note.start_time_ticks,
                    note.duration_ticks,
                    midi_note_name(note.midi_note).cyan(),
                    note.velocity
                ));
            }
            CommandResult::Message(output.trim_end().to_string())
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `json`: the result without the raw bytes, as JSON
pub fn cmd_json(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.current() {
        Ok(result) => match result_json(result) {
            Ok(json) => CommandResult::Message(json),
            Err(e) => CommandResult::Error(format!("Failed to serialize: {}", e)),
        },
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// A directory argument keeps the generated file name; anything else is the
/// file itself
fn save_path(args: &str, file_name: &str) -> PathBuf {
    if args.is_empty() {
        return PathBuf::from(file_name);
    }
    let path = Path::new(args);
    if path.is_dir() {
        path.join(file_name)
    } else {
        path.to_path_buf()
    }
}

pub fn result_json(result: &MidiGenerationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&serde_json::json!({
        "finalFileName": result.final_file_name,
        "sizeBytes": result.midi_bytes.len(),
        "totalTicks": result.total_ticks(),
        "chordDetails": result.chord_details,
        "notes": result.notes,
    }))
}

/// One-line report after a generation
pub fn summary(result: &MidiGenerationResult, meter: TimeSignature) -> String {
    let chords = result.chord_details.iter().filter(|c| !c.is_rest).count();
    let bars = result.total_ticks() as f64 / meter.ticks_per_bar() as f64;
    let mut output = format!(
        "{} {}: {} chords, {} notes, {:.2} bars",
        "✓".bright_green(),
        result.final_file_name.bright_green(),
        chords,
        result.notes.len(),
        bars
    );
    for invalid in result.invalid_chords() {
        output.push_str(&format!(
            "\n  {} {}: {}",
            "⚠".yellow(),
            invalid.symbol.yellow(),
            invalid.error.as_deref().unwrap_or("invalid chord")
        ));
    }
    output
}

pub fn details_table(details: &[ChordGenerationData]) -> String {
    let mut output = format!("{}\n", "🎼 Chords:".bold());
    for (i, chord) in details.iter().enumerate() {
        let line = chord.to_string();
        let line = if chord.is_rest {
            line.dimmed().to_string()
        } else if !chord.is_valid {
            line.red().to_string()
        } else {
            line
        };
        output.push_str(&format!("  {:>2}. {}\n", i + 1, line));
    }
    output.trim_end().to_string()
}
