//! Bot command parsing and execution.
//!
//! This module turns Matrix messages into game operations and the game's
//! failures into replies.
//!
//! # Architecture
//!
//! ```text
//! Matrix Message
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← Entry point: parse() + parse_command()
//! └─────────────┘
//!      │
//!      ├── parse() ────────────────────┐
//!      │                               ▼
//!                          ┌──────────────────┐
//!                          │  command::Command│
//!                          └──────────────────┘
//!      │
//!      └── parse_command() ───────────┐
//!                                     ▼
//!                          ┌─────────────────────┐
//!                          │ Action Handlers     │
//!                          │  - handle_help      │
//!                          │  - handle_start_game│
//!                          │  - handle_add_player│
//!                          │  - handle_done      │
//!                          │  - handle_reveal    │
//!                          │  - handle_end_game  │
//!                          └─────────────────────┘
//!                                     │
//!                                     ▼
//!                          ┌────────────────────┐
//!                          │  CommandResult     │
//!                          │  - response (MD)   │
//!                          └────────────────────┘
//! ```
//!
//! Game announcements (player list, reveal prompts...) are posted by the
//! [`GameMaster`](crate::game::GameMaster) itself. A [`CommandResult`] only
//! carries what must be answered directly to the command: help text or an
//! error.
//!
//! # Command Structure
//!
//! All commands follow the format: `!undercover <subcommand> [args...]`
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `help` | None | Display help information |
//! | `startgame` | None | Start a new game, replacing the current one |
//! | `addplayer` | `<name>` | Register a player |
//! | `done` | None | Deal roles (3 players minimum) |
//! | `reveal` | None | Prompt players one by one to reveal their word |
//! | `endgame` | None | End the game and disclose roles |
//!
//! # Error Handling
//!
//! - **Silent Errors** ([`CommandParseError::NotForBot`]): messages that aren't
//!   commands or are for a different bot.
//! - **User Errors** ([`CommandParseError::InvalidCommand`]): unknown
//!   subcommands, answered with a hint.

mod actions;
mod command;
mod commander;
mod markdown_response;

pub use crate::commands::commander::Commander;
use crate::game::GameError;

/// Runtime context for command execution.
#[derive(Debug)]
pub struct CommandContext {
    /// Matrix room ID where the command was issued
    pub room_id: String,
    /// Matrix user ID of the command issuer
    pub user_id: String,
}

/// Result of command execution.
///
/// # Examples
///
/// ```ignore
/// let result = CommandResult { response: None };
/// ```
#[derive(Debug)]
pub struct CommandResult {
    /// Markdown-formatted reply, `None` when the game already answered
    pub response: Option<String>,
}

impl CommandResult {
    /// Builds the result of a game operation, replying only on failure.
    fn from_game(result: Result<(), GameError>) -> Self {
        let response = match result {
            Ok(()) => None,
            Err(e) => markdown_response::format_game_error(&e),
        };

        CommandResult { response }
    }
}

/// Errors that can occur during command parsing.
///
/// # Variants
///
/// * `NotForBot` - Message is not a command or is for a different bot.
///   Should be handled silently without responding to the user.
///
/// * `InvalidCommand` - Command is unknown.
///   Contains a user-friendly error message to display.
#[derive(Debug)]
pub enum CommandParseError {
    /// Message is not for this bot (silent error)
    NotForBot,
    /// Invalid command syntax with error message
    InvalidCommand(String),
}
