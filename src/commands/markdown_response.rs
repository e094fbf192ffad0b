//! Markdown response formatters for bot commands.
//!
//! This module provides functions to format bot replies in Markdown format
//! for display in Matrix chat rooms.

use crate::game::GameError;

/// Formats the help message showing available bot commands.
///
/// # Examples
///
/// ```ignore
/// let help = format_help();
/// assert!(help.contains("Commands:"));
/// ```
pub fn format_help() -> String {
    let body = "Commands:\n\
        - `startgame`: start a new game in this room\n\
        - `addplayer <name>`: add a player to the game\n\
        - `done`: stop adding players and deal the roles (3 players minimum)\n\
        - `reveal`: let each player privately see their word, one after the other\n\
        - `endgame`: end the game and show everybody's role\n\
        - `help`: show this help message\n\n\
        Civilians share a word, the undercover gets a close but different one and Mister White gets none. \
        When prompted, tap 👀 on your turn message: your word is sent to you in a private message.";

    body.to_owned()
}

/// Formats a response for an unknown command.
///
/// # Examples
///
/// ```ignore
/// let msg = format_unknown_command();
/// assert!(msg.contains("Unknown command"));
/// ```
pub fn format_unknown_command() -> String {
    "Unknown command. Use `!undercover startgame` to start.".to_owned()
}

/// Formats a game error for the room.
///
/// Returns `None` for errors that must not be answered, i.e. stale reveal
/// actions.
pub fn format_game_error(error: &GameError) -> Option<String> {
    let message = match error {
        GameError::NoActiveSession => {
            "No active game. Use `!undercover startgame` to start.".to_owned()
        }
        GameError::MissingPlayerName => {
            "Please provide a player name. Example: `!undercover addplayer Alice`".to_owned()
        }
        GameError::InsufficientPlayers { count } => format!(
            "Not enough players! Add at least 3 players ({} registered).",
            count
        ),
        GameError::NoPlayers => "No players to reveal words for.".to_owned(),
        GameError::RolesNotAssigned => {
            "Roles are not assigned yet. Use `!undercover done` first.".to_owned()
        }
        GameError::StaleOrInvalidAction => return None,
    };

    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_help() {
        let help = format_help();
        assert!(help.contains("Commands:"));
        assert!(help.contains("`startgame`"));
        assert!(help.contains("`addplayer <name>`"));
        assert!(help.contains("`done`"));
        assert!(help.contains("`reveal`"));
        assert!(help.contains("`endgame`"));
    }

    #[test]
    fn test_format_unknown_command() {
        assert_eq!(
            format_unknown_command(),
            "Unknown command. Use `!undercover startgame` to start."
        );
    }

    #[test]
    fn test_format_game_error_insufficient_players() {
        assert_eq!(
            format_game_error(&GameError::InsufficientPlayers { count: 2 }).unwrap(),
            "Not enough players! Add at least 3 players (2 registered)."
        );
    }

    #[test]
    fn test_format_game_error_user_facing() {
        for error in [
            GameError::NoActiveSession,
            GameError::MissingPlayerName,
            GameError::NoPlayers,
            GameError::RolesNotAssigned,
        ] {
            assert!(format_game_error(&error).is_some());
        }
    }

    #[test]
    fn test_format_game_error_stale_action_is_silent() {
        assert!(format_game_error(&GameError::StaleOrInvalidAction).is_none());
    }
}
