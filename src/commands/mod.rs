//! Command registry for REPL commands
//!
//! Provides a clean, extensible pattern for handling REPL commands.

pub mod general;
pub mod generate;
pub mod options;

use anyhow::Result;
use chordsmith_core::{MidiGenerationOptions, MidiGenerationResult};

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// Not a command, treat the line as a progression
    NotACommand,
    /// Error occurred
    Error(String),
    /// Watch a file for changes
    Watch(String),
}

/// Session state shared by command handlers
pub struct CommandContext {
    /// Options for the next generation; the progression is the last one given
    pub options: MidiGenerationOptions,
    /// Result of the last generation, cleared whenever an option changes
    pub last_result: Option<MidiGenerationResult>,
}

impl CommandContext {
    pub fn new() -> Self {
        Self::with_options(MidiGenerationOptions::default())
    }

    pub fn with_options(options: MidiGenerationOptions) -> Self {
        Self {
            options,
            last_result: None,
        }
    }

    /// Generate from the current options and keep the result
    pub fn generate(&mut self) -> Result<&MidiGenerationResult> {
        let result = chordsmith_core::generate(&self.options)?;
        Ok(self.last_result.insert(result))
    }

    /// The last result, regenerating first if options changed since
    pub fn current(&mut self) -> Result<&MidiGenerationResult> {
        if self.options.progression.trim().is_empty() {
            anyhow::bail!("no progression yet; type one, e.g. C Am F G");
        }
        if self.last_result.is_none() {
            self.generate()?;
        }
        match &self.last_result {
            Some(result) => Ok(result),
            None => anyhow::bail!("generation produced no result"),
        }
    }

    /// Mark the last result stale after an option change
    pub fn invalidate(&mut self) {
        self.last_result = None;
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Commands indexed by their prefix, longest first
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        // Sort by prefix length descending for longest-match-first
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = if input.len() > prefix.len() {
                    input[prefix.len()..].trim()
                } else {
                    ""
                };
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Generation
    registry.register("gen", generate::cmd_gen);
    registry.register("save", generate::cmd_save);
    registry.register("details", generate::cmd_details);
    registry.register("notes", generate::cmd_notes);
    registry.register("json", generate::cmd_json);

    // Options
    registry.register("options", options::cmd_options);
    registry.register("tempo", options::cmd_tempo);
    registry.register("octave", options::cmd_octave);
    registry.register("voicing", options::cmd_voicing);
    registry.register("output", options::cmd_output);
    registry.register("velocity", options::cmd_velocity);
    registry.register("duration", options::cmd_duration);
    registry.register("transpose", options::cmd_transpose);
    registry.register("channel", options::cmd_channel);
    registry.register("timesig", options::cmd_timesig);
    registry.register("name", options::cmd_name);

    // General commands
    registry.register("qualities", general::cmd_qualities);
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);
    registry.register("watch", general::cmd_watch);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching() {
        let registry = create_registry();
        let mut ctx = CommandContext::new();

        assert!(matches!(
            registry.execute("quit", &mut ctx),
            CommandResult::Exit
        ));
        // A chord that merely starts with a command name is not that command
        assert!(matches!(
            registry.execute("names", &mut ctx),
            CommandResult::NotACommand
        ));
        assert!(matches!(
            registry.execute("C Am F G", &mut ctx),
            CommandResult::NotACommand
        ));
        match registry.execute("watch song.txt", &mut ctx) {
            CommandResult::Watch(path) => assert_eq!(path, "song.txt"),
            other => panic!("expected watch, got {:?}", other),
        }
    }

    #[test]
    fn test_every_command_registered() {
        let registry = create_registry();
        let commands = registry.list_commands();
        for name in [
            "gen", "save", "details", "notes", "json", "options", "tempo", "octave", "voicing",
            "output", "velocity", "duration", "transpose", "channel", "timesig", "name",
            "qualities", "watch", "help", "quit", "exit",
        ] {
            assert!(commands.contains(&name), "missing {}", name);
        }
    }

    #[test]
    fn test_current_regenerates_after_invalidate() {
        let mut ctx = CommandContext::new();
        assert!(ctx.current().is_err());

        ctx.options.progression = "C G".to_string();
        assert_eq!(ctx.current().unwrap().chord_details.len(), 2);

        ctx.options.progression = "C G Am".to_string();
        ctx.invalidate();
        assert_eq!(ctx.current().unwrap().chord_details.len(), 3);
    }
}
