//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, which serves as the main entry point
//! for processing bot commands. It coordinates command parsing and execution, routing
//! commands to their appropriate handlers.
//!
//! # Architecture
//!
//! The Commander follows a two-phase processing model:
//!
//! 1. **Parsing Phase** - Validates and parses raw message text into structured [`Command`] enums
//! 2. **Execution Phase** - Routes parsed commands to handlers driving the [`GameMaster`]
//!
//! # Flow
//!
//! ```text
//! Matrix Message → parse() → Command → parse_command() → CommandResult
//! ```
//!
//! # Examples
//!
//! ```ignore
//! let commander = Commander::new();
//!
//! let command = commander.parse("!undercover startgame")?;
//! let context = CommandContext {
//!     room_id: "!room:example.com".to_string(),
//!     user_id: "@user:example.com".to_string(),
//! };
//! let result = commander.parse_command(&command, &context, &master).await;
//! ```

use command_parser::Parser;

use crate::{
    commands::{
        CommandContext, CommandParseError, CommandResult,
        actions::{
            handle_add_player, handle_done, handle_end_game, handle_help, handle_reveal,
            handle_start_game,
        },
        command::{Command, format_command_error},
    },
    game::{GameMaster, Notifier},
};

/// Command orchestrator for parsing and executing bot commands.
///
/// # Command Prefix
///
/// All commands must start with the `!undercover` prefix. Messages without this prefix
/// are silently ignored (returning [`CommandParseError::NotForBot`]).
///
/// # Supported Commands
///
/// - `help` - Display help information
/// - `startgame` - Start a new game
/// - `addplayer <name>` - Register a player
/// - `done` - Deal the roles
/// - `reveal` - Start the reveal sequence
/// - `endgame` - End the game
pub struct Commander {
    /// Command parser for processing user commands
    parser: Parser,
}

impl Commander {
    /// Creates a new Commander instance with a configured command parser.
    ///
    /// The parser is configured to recognize commands starting with `!` as the command
    /// prefix and `-` as the option prefix.
    pub fn new() -> Self {
        let parser = Parser::new('!', '-');
        Commander { parser }
    }

    /// Parses a Matrix message body into a structured command.
    ///
    /// # Arguments
    ///
    /// * `body` - The raw message text from Matrix
    ///
    /// # Returns
    ///
    /// * `Ok(Command)` - Successfully parsed command
    /// * `Err(CommandParseError::NotForBot)` - Message is not a command or for a different bot
    /// * `Err(CommandParseError::InvalidCommand)` - Unknown subcommand, with the reply to send
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let commander = Commander::new();
    ///
    /// assert!(commander.parse("!undercover done").is_ok());
    /// assert!(commander.parse("Hello, world!").is_err());
    /// ```
    pub fn parse(&self, body: &str) -> Result<Command, CommandParseError> {
        Command::parse(&self.parser, body).map_err(|error| {
            // Return silently if the command is not for the bot
            // Otherwise, send an error message
            match format_command_error(error) {
                Some(message) => CommandParseError::InvalidCommand(message),
                None => CommandParseError::NotForBot,
            }
        })
    }

    /// Executes a parsed command against the room's game.
    ///
    /// # Arguments
    ///
    /// * `command` - The parsed command to execute
    /// * `context` - Room and issuer of the command
    /// * `master` - Game engine hosting every room's game
    ///
    /// # Command Handlers
    ///
    /// - [`Command::Help`] → [`handle_help`]
    /// - [`Command::StartGame`] → [`handle_start_game`]
    /// - [`Command::AddPlayer`] → [`handle_add_player`]
    /// - [`Command::Done`] → [`handle_done`]
    /// - [`Command::Reveal`] → [`handle_reveal`]
    /// - [`Command::EndGame`] → [`handle_end_game`]
    pub async fn parse_command<N: Notifier>(
        &self,
        command: &Command,
        context: &CommandContext,
        master: &GameMaster<N>,
    ) -> CommandResult {
        match command {
            Command::Help => handle_help(),
            Command::StartGame => handle_start_game(context, master).await,
            Command::AddPlayer(_) => handle_add_player(context, command, master).await,
            Command::Done => handle_done(context, master).await,
            Command::Reveal => handle_reveal(context, master).await,
            Command::EndGame => handle_end_game(context, master).await,
        }
    }
}
