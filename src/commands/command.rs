//! Command parsing and handling.
//!
//! This module provides command parsing functionality for the bot, converting
//! Matrix message text into structured [`Command`] enums that can be processed
//! by the application.

use command_parser::{Command as ParserCommand, Parser};
use log::debug;

use crate::commands::markdown_response::format_unknown_command;

/// Name every command must start with, after the `!` prefix.
pub const BOT_COMMAND: &str = "undercover";

/// Represents a parsed bot command.
///
/// Commands are parsed from Matrix message text and represent the various
/// operations players can perform with the bot.
#[derive(Debug, Hash, PartialEq, Eq)]
pub enum Command {
    /// Display help information
    Help,
    /// Start a new game in the room
    StartGame,
    /// Register a player
    ///
    /// # Fields
    ///
    /// * `String` - Player name, empty when none was given
    AddPlayer(String),
    /// Close registration and deal roles
    Done,
    /// Start prompting players to reveal their words
    Reveal,
    /// End the game and disclose roles
    EndGame,
}

/// Errors that can occur during command parsing.
#[derive(Debug)]
pub enum CommandParsingError {
    /// The message could not be parsed as a command
    UnableToParse,
    /// The command is not for this bot (wrong prefix)
    NotForBot,
    /// The command is not recognized
    Unknown,
}

impl Command {
    /// Parses a message string into a Command.
    ///
    /// # Returns
    ///
    /// * `Ok(Command)` - If the message is a valid bot command
    /// * `Err(CommandParsingError)` - If parsing fails or the command is unknown
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let parser = Parser::new('!', '-');
    /// let result = Command::parse(&parser, "!undercover startgame");
    /// assert!(matches!(result, Ok(Command::StartGame)));
    /// ```
    pub fn parse(parser: &Parser, body: &str) -> Result<Self, CommandParsingError> {
        // For an unknown reason the parser ignores the last word, so we add a dummy word at the end
        let body = body.to_string() + " dummy";

        // This is normal to fails if the message is not a command
        let command = match parser.parse(&body) {
            Ok(cmd) => cmd,
            Err(_) => return Err(CommandParsingError::UnableToParse),
        };

        if command.name != BOT_COMMAND {
            return Err(CommandParsingError::NotForBot);
        }

        debug!("Parsing command: {:?}", command);

        if command.arguments.is_empty() {
            return Ok(Command::Help);
        }

        match command.arguments[0].as_str() {
            "help" => Ok(Command::Help),
            "startgame" => Ok(Command::StartGame),
            "addplayer" => Ok(Command::AddPlayer(Self::parse_player_name(&command))),
            "done" => Ok(Command::Done),
            "reveal" => Ok(Command::Reveal),
            "endgame" => Ok(Command::EndGame),
            _ => Err(CommandParsingError::Unknown),
        }
    }

    /// Joins every argument after `addplayer` so names may contain spaces.
    ///
    /// A missing name yields an empty string; the game rejects it later.
    fn parse_player_name(command: &ParserCommand) -> String {
        let name = command.arguments[1..].join(" ");
        debug!("Parsed addplayer command - player_name: {}", name);
        name
    }
}

/// Formats a command error into a user-friendly message.
///
/// Only [`CommandParsingError::Unknown`] produces a message; other errors mean
/// the message was not meant for the bot.
pub fn format_command_error(error: CommandParsingError) -> Option<String> {
    match error {
        CommandParsingError::Unknown => Some(format_unknown_command()),
        _ => None,
    }
}
