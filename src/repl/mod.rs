//! REPL (Read-Eval-Print Loop) for chord progressions

use crate::commands::generate::{cmd_gen, summary};
use crate::commands::{create_registry, CommandContext, CommandRegistry, CommandResult};
use crate::convert::convert_file;
use crate::repl::watcher::FileWatcher;
use anyhow::Result;
use chordsmith_core::MidiGenerationOptions;
use colored::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use notify::Event;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RustylineResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::debug;

pub mod watcher;

/// Types of events the REPL loop handles
enum ReplEvent {
    Input(Result<String, ReadlineError>),
}

/// Whether the loop keeps going after a line
enum Flow {
    Continue,
    Exit,
}

/// Interactive REPL: type progressions, tweak options, save MIDI files
pub struct Repl {
    editor: Option<DefaultEditor>,
    ctx: CommandContext,

    // Event channels
    tx_input: Sender<ReplEvent>,
    rx_input: Receiver<ReplEvent>,
    tx_watcher: Sender<notify::Result<Event>>,
    rx_watcher: Receiver<notify::Result<Event>>,

    // File watcher
    watcher: Option<FileWatcher>,
    /// Progression text last generated from each watched file
    loaded: HashMap<PathBuf, String>,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new() -> RustylineResult<Self> {
        Self::with_options(MidiGenerationOptions::default())
    }

    /// Create a REPL whose session starts from `options`
    pub fn with_options(options: MidiGenerationOptions) -> RustylineResult<Self> {
        let editor = DefaultEditor::new()?;
        let (tx_input, rx_input) = unbounded();
        let (tx_watcher, rx_watcher) = unbounded();

        Ok(Repl {
            editor: Some(editor),
            ctx: CommandContext::with_options(options),
            tx_input,
            rx_input,
            tx_watcher,
            rx_watcher,
            watcher: None,
            loaded: HashMap::new(),
        })
    }

    /// Watch a progression file, converting it right away and again after
    /// every change
    pub fn watch(&mut self, path: &str) {
        if self.watcher.is_none() {
            match FileWatcher::new(self.tx_watcher.clone()) {
                Ok(w) => self.watcher = Some(w),
                Err(e) => {
                    println!("{} Failed to create watcher: {}", "Error:".red(), e);
                    return;
                }
            }
        }

        let Some(watcher) = &mut self.watcher else {
            return;
        };
        match watcher.watch(path) {
            Ok(canonical) => {
                println!(
                    "{} Watching {} for changes...",
                    "👀".bright_cyan(),
                    path.bright_green()
                );
                self.reload(&canonical);
            }
            Err(e) => println!("{} Failed to watch {}: {}", "Error:".red(), path, e),
        }
    }

    /// Regenerate a watched file's MIDI output unless its progression is
    /// unchanged since the last load
    fn reload(&mut self, path: &Path) {
        let progression = match crate::convert::read_progression(path) {
            Ok(progression) => progression,
            Err(e) => {
                println!("{} {:#}", "Error:".red(), e);
                return;
            }
        };
        if self.loaded.get(path) == Some(&progression) {
            debug!(path = %path.display(), "progression unchanged, skipping");
            return;
        }

        match convert_file(path, None, &self.ctx.options) {
            Ok((output, result)) => {
                println!(
                    "{} {} → {}",
                    "⚡".bright_yellow(),
                    path.display(),
                    output.display().to_string().bright_green()
                );
                println!("{}", summary(&result, self.ctx.options.time_signature));
                self.ctx.options.progression = progression.clone();
                self.ctx.last_result = Some(result);
                self.loaded.insert(path.to_path_buf(), progression);
            }
            Err(e) => println!("{} {:#}", "Error:".bright_red().bold(), e),
        }
    }

    /// Run one input line through the registry; anything that is not a
    /// command is a progression
    fn handle_line(&mut self, registry: &CommandRegistry, line: &str) -> Flow {
        let result = match registry.execute(line, &mut self.ctx) {
            CommandResult::NotACommand => cmd_gen(line, &mut self.ctx),
            other => other,
        };

        match result {
            CommandResult::Success | CommandResult::NotACommand => {}
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::Exit => return Flow::Exit,
            CommandResult::Error(e) => {
                println!("{} {}", "Error:".bright_red().bold(), e.red())
            }
            CommandResult::Watch(path) => self.watch(&path),
        }
        Flow::Continue
    }

    fn handle_watch_event(&mut self, event: Event) {
        let changed = match &self.watcher {
            Some(watcher) => watcher.changed_files(&event),
            None => return,
        };
        for path in changed {
            self.reload(&path);
        }
    }

    /// Start the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🎵".bright_yellow(),
            "Chordsmith: chord progressions to MIDI".bright_cyan().bold()
        );
        println!(
            "Type progressions like: {}, {}, {}",
            "C Am F G".cyan(),
            "Dm7:h G7:h Cmaj7".cyan(),
            "C:1 R:1 Am/E".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        // Move editor to thread
        let mut editor = self
            .editor
            .take()
            .ok_or_else(|| anyhow::anyhow!("REPL is already running"))?;
        let tx_input = self.tx_input.clone();

        thread::spawn(move || loop {
            let prompt = format!("{} ", "chordsmith>".bright_magenta().bold());
            let readline = editor.readline(&prompt);

            match readline {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if !line.is_empty() {
                        let _ = editor.add_history_entry(&line);
                    }
                    if tx_input.send(ReplEvent::Input(Ok(line))).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx_input.send(ReplEvent::Input(Err(err)));
                    break;
                }
            }
        });

        let registry = create_registry();

        loop {
            crossbeam_channel::select! {
                recv(self.rx_input) -> msg => match msg {
                    Ok(ReplEvent::Input(Ok(line))) => {
                        if line.is_empty() {
                            continue;
                        }
                        if let Flow::Exit = self.handle_line(&registry, &line) {
                            println!("{} 🎵", "Goodbye!".bright_cyan());
                            break;
                        }
                    }
                    Ok(ReplEvent::Input(Err(ReadlineError::Interrupted)))
                    | Ok(ReplEvent::Input(Err(ReadlineError::Eof))) => {
                        println!("{} 🎵", "Goodbye!".bright_cyan());
                        break;
                    }
                    Ok(ReplEvent::Input(Err(err))) => {
                        println!(
                            "{} {}",
                            "Error reading input:".bright_red().bold(),
                            err.to_string().red()
                        );
                        break;
                    }
                    Err(_) => break, // Channel closed
                },

                recv(self.rx_watcher) -> msg => match msg {
                    Ok(Ok(event)) => self.handle_watch_event(event),
                    Ok(Err(e)) => println!("{} Watch error: {}", "Error:".red(), e),
                    Err(_) => break, // Channel closed
                }
            }
        }

        Ok(())
    }
}

/// Convenience function to start the REPL
pub fn start() -> Result<()> {
    let mut repl = Repl::new().map_err(|e| anyhow::anyhow!("Failed to initialize REPL: {}", e))?;
    repl.run()
}

/// Start the REPL already watching a progression file
pub fn start_watching(path: &str) -> Result<()> {
    let mut repl = Repl::new().map_err(|e| anyhow::anyhow!("Failed to initialize REPL: {}", e))?;
    repl.watch(path);
    repl.run()
}
