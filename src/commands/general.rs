//! General REPL commands (help, quit, watch, qualities)

use crate::commands::{CommandContext, CommandResult};
use chordsmith_core::types::quality::CHORD_QUALITIES;
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `watch [file]` command
pub fn cmd_watch(args: &str, _ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: watch <file>".to_string());
    }
    CommandResult::Watch(args.to_string())
}

/// Handle `qualities`: every chord quality token and its intervals
pub fn cmd_qualities(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(qualities_table())
}

fn qualities_table() -> String {
    let mut output = format!("{}\n", "🎼 Chord qualities (C root):".bold());
    for (token, intervals) in CHORD_QUALITIES {
        let shown = if token.is_empty() { "(major)" } else { *token };
        let intervals: Vec<String> = intervals.iter().map(u8::to_string).collect();
        output.push_str(&format!(
            "  {:<10} {}\n",
            shown.cyan(),
            intervals.join(" ")
        ));
    }
    output.trim_end().to_string()
}

/// Print help information
fn print_help() {
    println!("{}", "🎵 Chordsmith Help".bold());
    println!("{}", "==================".bold());
    println!();
    println!("{}", "Progressions:".green());
    println!("  {}             - Generate from a progression", "C Am F G".cyan());
    println!("  {}         - Same, as a command", "gen C Am F G".cyan());
    println!(
        "  {}  - Separators: space , | -> -",
        "C, Am | F -> G".cyan()
    );
    println!(
        "  {}   - Durations in bars, named codes or ticks",
        "C:0.5 G:h Am:T64".cyan()
    );
    println!("  {}        - Rest (duration required)", "C:1 R:1 G".cyan());
    println!("  {}          - Slash chord", "Am/E C/G".cyan());
    println!("  {}                 - Single note", "C1".cyan());
    println!();
    println!("{}", "Durations:".green());
    println!("  {}  - Bars", "1 0.5 1.5 .25".cyan());
    println!("  {}  - Named (whole .. sixteenth, dotted)", "w h q e s dh dq de 2w 4w".cyan());
    println!("  {}          - Absolute ticks (128 per quarter)", "T<n>".cyan());
    println!();
    println!("{}", "Results:".green());
    println!("  {}      - Write the last MIDI file", "save [path]".cyan());
    println!("  {}          - Per-chord voicing and bass", "details".cyan());
    println!("  {}            - Flattened note list", "notes".cyan());
    println!("  {}             - Result as JSON", "json".cyan());
    println!();
    println!("{}", "Options:".green());
    println!("  {}          - Show all options", "options".cyan());
    println!(
        "  {} - root first second smooth pianist open spread cocktail",
        "voicing <name>".cyan()
    );
    println!(
        "  {}   - chords chords+bass bass bass+fifth",
        "output <type>".cyan()
    );
    println!("  {}       - Tempo (4-960)", "tempo <bpm>".cyan());
    println!("  {}       - Base octave (0-9)", "octave <n>".cyan());
    println!("  {}  - Default chord duration", "duration <code>".cyan());
    println!("  {}     - Note velocity (1-127)", "velocity <n>".cyan());
    println!("  {}   - Transpose (-24..24)", "transpose <n>".cyan());
    println!("  {}      - MIDI channel (1-16)", "channel <n>".cyan());
    println!("  {}      - Time signature, e.g. 3/4", "timesig <n/d>".cyan());
    println!("  {} - File name ('auto' to derive)", "name <file|auto>".cyan());
    println!();
    println!("{}", "Other Commands:".green());
    println!("  {}        - List chord qualities", "qualities".bright_green());
    println!(
        "  {}     - Regenerate <file>.mid on every save",
        "watch <file>".bright_green()
    );
    println!("  {}             - Show this help", "help".bright_green());
    println!("  {}             - Exit the REPL", "quit".bright_red());
}
