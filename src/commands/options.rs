//! Option commands
//!
//! Each command shows the current value when called without arguments and
//! sets it otherwise. Setting any option marks the last result stale.

use crate::commands::{CommandContext, CommandResult};
use chordsmith_core::parser::parse_duration;
use chordsmith_core::{MidiGenerationOptions, OutputType, TimeSignature, VoicingStrategy};
use colored::*;

/// Handle `options`: every current setting
pub fn cmd_options(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(describe(&ctx.options))
}

/// Handle `tempo [bpm]`
pub fn cmd_tempo(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Current tempo: {} BPM", ctx.options.tempo));
    }
    match args.parse::<u32>() {
        Ok(bpm)
            if (MidiGenerationOptions::MIN_TEMPO..=MidiGenerationOptions::MAX_TEMPO)
                .contains(&bpm) =>
        {
            ctx.options.tempo = bpm;
            set(ctx, format!("🎵 Tempo set to {} BPM", bpm))
        }
        _ => CommandResult::Error(format!(
            "Invalid tempo. Use a value between {}-{} BPM",
            MidiGenerationOptions::MIN_TEMPO,
            MidiGenerationOptions::MAX_TEMPO
        )),
    }
}

/// Handle `octave [n]`
pub fn cmd_octave(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Base octave: {}", ctx.options.base_octave));
    }
    match args.parse::<u8>() {
        Ok(octave) if octave <= MidiGenerationOptions::MAX_BASE_OCTAVE => {
            ctx.options.base_octave = octave;
            set(ctx, format!("Base octave set to {}", octave))
        }
        _ => CommandResult::Error(format!(
            "Invalid octave. Use 0-{}",
            MidiGenerationOptions::MAX_BASE_OCTAVE
        )),
    }
}

/// Handle `voicing [strategy]`
pub fn cmd_voicing(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        let names: Vec<String> = VoicingStrategy::ALL
            .iter()
            .map(|v| mark_current(v.name(), *v == ctx.options.voicing))
            .collect();
        return CommandResult::Message(format!("Voicing: {}", names.join(" ")));
    }
    match VoicingStrategy::from_str(args) {
        Some(voicing) => {
            ctx.options.voicing = voicing;
            set(ctx, format!("Voicing set to {}", voicing.name()))
        }
        None => CommandResult::Error(format!(
            "Unknown voicing '{}'. Options: {}",
            args,
            VoicingStrategy::ALL.map(|v| v.name()).join(", ")
        )),
    }
}

/// Handle `output [type]`
pub fn cmd_output(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        let names: Vec<String> = OutputType::ALL
            .iter()
            .map(|o| mark_current(o.name(), *o == ctx.options.output_type))
            .collect();
        return CommandResult::Message(format!("Output: {}", names.join(" ")));
    }
    match OutputType::from_str(args) {
        Some(output) => {
            ctx.options.output_type = output;
            set(ctx, format!("Output set to {}", output.name()))
        }
        None => CommandResult::Error(format!(
            "Unknown output type '{}'. Options: {}",
            args,
            OutputType::ALL.map(|o| o.name()).join(", ")
        )),
    }
}

/// Handle `velocity [1-127]`
pub fn cmd_velocity(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Velocity: {}", ctx.options.velocity));
    }
    match args.parse::<u8>() {
        Ok(velocity) if (1..=127).contains(&velocity) => {
            ctx.options.velocity = velocity;
            set(ctx, format!("Velocity set to {}", velocity))
        }
        _ => CommandResult::Error("Invalid velocity. Use 1-127".to_string()),
    }
}

/// Handle `duration [code]`: the default length of chords without one
pub fn cmd_duration(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Default chord duration: {}",
            ctx.options.chord_duration
        ));
    }
    match parse_duration(args, ctx.options.time_signature) {
        Ok(ticks) => {
            ctx.options.chord_duration = args.to_string();
            set(
                ctx,
                format!("Default chord duration set to {} ({} ticks)", args, ticks),
            )
        }
        Err(e) => CommandResult::Error(format!("Invalid duration: {}", e)),
    }
}

/// Handle `transpose [semitones]`
pub fn cmd_transpose(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Transpose: {:+}", ctx.options.transpose));
    }
    let max = MidiGenerationOptions::MAX_TRANSPOSE;
    match args.trim_start_matches('+').parse::<i8>() {
        Ok(semitones) if (-max..=max).contains(&semitones) => {
            ctx.options.transpose = semitones;
            set(ctx, format!("Transpose set to {:+} semitones", semitones))
        }
        _ => CommandResult::Error(format!("Invalid transpose. Use -{}..{}", max, max)),
    }
}

/// Handle `channel [1-16]`
pub fn cmd_channel(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("MIDI channel: {}", ctx.options.channel + 1));
    }
    match args.parse::<u8>() {
        Ok(channel) if (1..=16).contains(&channel) => {
            ctx.options.channel = channel - 1;
            set(ctx, format!("🎹 MIDI channel set to {}", channel))
        }
        _ => CommandResult::Error("Invalid channel. Use 1-16".to_string()),
    }
}

/// Handle `timesig [n/d]`
pub fn cmd_timesig(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        let meter = ctx.options.time_signature;
        return CommandResult::Message(format!(
            "Time signature: {}/{}",
            meter.numerator, meter.denominator
        ));
    }
    match parse_time_signature(args) {
        Some(meter) => {
            ctx.options.time_signature = meter;
            set(
                ctx,
                format!("Time signature set to {}/{}", meter.numerator, meter.denominator),
            )
        }
        None => CommandResult::Error(
            "Invalid time signature. Use n/d with d a power of two, e.g. 3/4 or 6/8".to_string(),
        ),
    }
}

/// Handle `name [file]`; `name auto` goes back to a derived name
pub fn cmd_name(args: &str, ctx: &mut CommandContext) -> CommandResult {
    match args {
        "" => CommandResult::Message(match &ctx.options.file_name {
            Some(name) => format!("File name: {}", name),
            None => "File name: derived from the progression".to_string(),
        }),
        "auto" | "-" => {
            ctx.options.file_name = None;
            set(ctx, "File name will be derived from the progression".to_string())
        }
        name => {
            ctx.options.file_name = Some(name.to_string());
            set(ctx, format!("File name set to {}", name))
        }
    }
}

pub fn parse_time_signature(s: &str) -> Option<TimeSignature> {
    let (n, d) = s.split_once('/')?;
    let meter = TimeSignature::new(n.trim().parse().ok()?, d.trim().parse().ok()?);
    meter.is_valid().then_some(meter)
}

fn set(ctx: &mut CommandContext, message: String) -> CommandResult {
    ctx.invalidate();
    CommandResult::Message(message.bright_green().to_string())
}

fn mark_current(name: &str, current: bool) -> String {
    if current {
        format!("[{}]", name).bright_green().to_string()
    } else {
        name.to_string()
    }
}

pub fn describe(options: &MidiGenerationOptions) -> String {
    let progression = if options.progression.is_empty() {
        "(none)".dimmed().to_string()
    } else {
        options.progression.cyan().to_string()
    };
    let rows = [
        ("progression", progression),
        (
            "name",
            options
                .file_name
                .clone()
                .unwrap_or_else(|| "(derived)".to_string()),
        ),
        ("voicing", options.voicing.name().to_string()),
        ("output", options.output_type.name().to_string()),
        ("octave", options.base_octave.to_string()),
        ("duration", options.chord_duration.clone()),
        ("tempo", format!("{} BPM", options.tempo)),
        (
            "timesig",
            format!(
                "{}/{}",
                options.time_signature.numerator, options.time_signature.denominator
            ),
        ),
        ("velocity", options.velocity.to_string()),
        ("transpose", format!("{:+}", options.transpose)),
        ("channel", (options.channel + 1).to_string()),
    ];

    let mut output = format!("{}\n", "⚙️  Options:".bold());
    for (name, value) in rows {
        output.push_str(&format!("  {:<12} {}\n", name.green(), value));
    }
    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandHandler;

    #[test]
    fn test_setters_update_and_invalidate() {
        let mut ctx = CommandContext::new();
        ctx.options.progression = "C G".to_string();
        ctx.generate().unwrap();

        assert!(matches!(cmd_tempo("90", &mut ctx), CommandResult::Message(_)));
        assert_eq!(ctx.options.tempo, 90);
        assert!(ctx.last_result.is_none());

        cmd_voicing("smooth", &mut ctx);
        cmd_output("bass+fifth", &mut ctx);
        cmd_octave("3", &mut ctx);
        cmd_velocity("80", &mut ctx);
        cmd_duration("h", &mut ctx);
        cmd_transpose("+2", &mut ctx);
        cmd_channel("10", &mut ctx);
        cmd_timesig("3/4", &mut ctx);
        cmd_name("demo", &mut ctx);

        let options = &ctx.options;
        assert_eq!(options.voicing, VoicingStrategy::Smooth);
        assert_eq!(options.output_type, OutputType::BassAndFifth);
        assert_eq!(options.base_octave, 3);
        assert_eq!(options.velocity, 80);
        assert_eq!(options.chord_duration, "h");
        assert_eq!(options.transpose, 2);
        assert_eq!(options.channel, 9);
        assert_eq!(options.time_signature, TimeSignature::new(3, 4));
        assert_eq!(options.file_name.as_deref(), Some("demo"));

        cmd_name("auto", &mut ctx);
        assert_eq!(ctx.options.file_name, None);
    }

    #[test]
    fn test_rejections_leave_options_alone() {
        let mut ctx = CommandContext::new();
        let before = ctx.options.clone();
        let cases: [(CommandHandler, &str); 14] = [
            (cmd_tempo, "0"),
            (cmd_tempo, "3"),
            (cmd_tempo, "fast"),
            (cmd_octave, "10"),
            (cmd_voicing, "jazz"),
            (cmd_output, "drums"),
            (cmd_velocity, "0"),
            (cmd_velocity, "200"),
            (cmd_duration, "0.33"),
            (cmd_transpose, "30"),
            (cmd_channel, "0"),
            (cmd_channel, "17"),
            (cmd_timesig, "5/6"),
            (cmd_timesig, "4"),
        ];
        for (handler, arg) in cases {
            assert!(
                matches!(handler(arg, &mut ctx), CommandResult::Error(_)),
                "{:?} should be rejected",
                arg
            );
        }
        assert_eq!(ctx.options, before);
    }

    #[test]
    fn test_parse_time_signature() {
        assert_eq!(parse_time_signature("6/8"), Some(TimeSignature::new(6, 8)));
        assert_eq!(parse_time_signature(" 7 / 4 "), Some(TimeSignature::new(7, 4)));
        assert_eq!(parse_time_signature("3/3"), None);
        assert_eq!(parse_time_signature("0/4"), None);
        assert_eq!(parse_time_signature("x/4"), None);
    }

    #[test]
    fn test_describe_lists_every_option() {
        colored::control::set_override(false);
        let text = describe(&MidiGenerationOptions::new("C Am"));
        for name in ["progression", "voicing", "output", "octave", "tempo", "channel"] {
            assert!(text.contains(name), "missing {}", name);
        }
        assert!(text.contains("120 BPM"));
        assert!(text.contains("C Am"));
    }
}
