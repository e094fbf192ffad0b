//! Reveal command handler.

use log::debug;

use crate::{
    commands::{CommandContext, CommandResult},
    game::{GameMaster, Notifier},
};

/// Starts prompting the players of the room's game to reveal their word.
///
/// Each prompt carries an action; tapping it is handled by
/// [`GameMaster::handle_reveal_action`], not by a command.
pub async fn handle_reveal<N: Notifier>(
    context: &CommandContext,
    master: &GameMaster<N>,
) -> CommandResult {
    debug!("handling reveal command in {}", context.room_id);

    CommandResult::from_game(master.begin_reveal(&context.room_id).await)
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

    #[tokio::test]
    async fn test_handle_reveal_without_players() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_message()
            .returning(|_, _| Ok("$event".to_string()));
        notifier.expect_forget_actions().returning(|_| ());
        let master = GameMaster::new(Arc::new(notifier), Vec::new());
        let context = create_test_context();
        master.start_session(&context.room_id).await;

        let result = handle_reveal(&context, &master).await;
        assert_eq!(result.response.unwrap(), "No players to reveal words for.");
    }

    #[tokio::test]
    async fn test_handle_reveal_sends_first_prompt() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_message()
            .returning(|_, _| Ok("$event".to_string()));
        notifier.expect_edit_message().returning(|_, _, _| Ok(()));
        notifier
            .expect_send_message_with_action()
            .withf(|_, body, token| body.contains("**Alice**") && token == "reveal_0")
            .times(1)
            .returning(|_, _, _| Ok("$prompt".to_string()));
        notifier.expect_forget_actions().returning(|_| ());
        let master = GameMaster::new(Arc::new(notifier), Vec::new());

        let context = create_test_context();
        master.start_session(&context.room_id).await;
        for name in ["Alice", "Bob", "Carol"] {
            master.add_player(&context.room_id, name).await.unwrap();
        }
        master.assign_roles(&context.room_id).await.unwrap();

        assert!(handle_reveal(&context, &master).await.response.is_none());
    }
}
