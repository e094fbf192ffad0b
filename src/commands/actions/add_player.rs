//! Add player command handler.

use log::debug;

use crate::{
    commands::{CommandContext, CommandResult, command::Command},
    game::{GameMaster, Notifier},
};

/// Registers the player named in an [`Command::AddPlayer`] command.
///
/// # Arguments
///
/// * `context` - Room and issuer of the command
/// * `command` - Must be [`Command::AddPlayer`]
/// * `master` - Game engine hosting the room's game
///
/// # Returns
///
/// A [`CommandResult`] with no reply on success. The game master refreshes
/// the player list itself. Errors (no game, missing name) are answered.
pub async fn handle_add_player<N: Notifier>(
    context: &CommandContext,
    command: &Command,
    master: &GameMaster<N>,
) -> CommandResult {
    let Command::AddPlayer(name) = command else {
        return CommandResult { response: None };
    };

    debug!("handling addplayer command for {:?} in {}", name, context.room_id);

    CommandResult::from_game(master.add_player(&context.room_id, name).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::game::MockNotifier;

    fn create_test_context() -> CommandContext {
        CommandContext {
            room_id: "!room:example.com".to_string(),
            user_id: "@user:example.com".to_string(),
        }
    }

    fn accepting_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_message()
            .returning(|_, _| Ok("$event".to_string()));
        notifier.expect_edit_message().returning(|_, _, _| Ok(()));
        notifier.expect_forget_actions().returning(|_| ());
        notifier
    }

    #[tokio::test]
    async fn test_handle_add_player_without_game() {
        let master = GameMaster::new(Arc::new(MockNotifier::new()), Vec::new());
        let command = Command::AddPlayer("Alice".to_string());

        let result = handle_add_player(&create_test_context(), &command, &master).await;
        assert!(result.response.unwrap().contains("No active game"));
    }

    #[tokio::test]
    async fn test_handle_add_player_missing_name() {
        let master = GameMaster::new(Arc::new(accepting_notifier()), Vec::new());
        let context = create_test_context();
        master.start_session(&context.room_id).await;

        let command = Command::AddPlayer(String::new());
        let result = handle_add_player(&context, &command, &master).await;
        assert!(result.response.unwrap().contains("provide a player name"));
    }

    #[tokio::test]
    async fn test_handle_add_player_success() {
        let master = GameMaster::new(Arc::new(accepting_notifier()), Vec::new());
        let context = create_test_context();
        master.start_session(&context.room_id).await;

        let command = Command::AddPlayer("Alice".to_string());
        let result = handle_add_player(&context, &command, &master).await;
        assert!(result.response.is_none());
    }
}
