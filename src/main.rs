use anyhow::Result;
use chordsmith::commands::generate::summary;
use chordsmith::{convert_file, MidiGenerationOptions};
use colored::*;
use std::env;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "\
Usage:
  chordsmith                     Interactive REPL
  chordsmith <file> [out.mid]    Convert a progression file to MIDI
  chordsmith --watch <file>      REPL that regenerates <file>.mid on every save

Set RUST_LOG (e.g. RUST_LOG=chordsmith=debug) for diagnostics.";

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] => chordsmith::repl::start(),
        ["-h" | "--help"] => {
            println!("{}", USAGE);
            Ok(())
        }
        ["-V" | "--version"] => {
            println!("chordsmith {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        ["--watch" | "-w", file] => chordsmith::repl::start_watching(file),
        [file] if !file.starts_with('-') => convert(file, None),
        [file, output] if !file.starts_with('-') => convert(file, Some(*output)),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}

fn convert(input: &str, output: Option<&str>) -> Result<()> {
    let options = MidiGenerationOptions::default();
    let (written, result) = convert_file(Path::new(input), output.map(Path::new), &options)?;
    println!("{}", summary(&result, options.time_signature));
    println!("{} {}", "💾 Wrote".bright_green(), written.display());
    Ok(())
}
