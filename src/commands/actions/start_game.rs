//! Start game command handler.
//!
//! Opens a new game in the room. Always succeeds and silently drops the
//! previous game of the room, players included.

use log::debug;

use crate::{
    commands::{CommandContext, CommandResult},
    game::{GameMaster, Notifier},
};

/// Starts a new game in the command's room.
///
/// The game master posts the confirmation itself, so the result carries no reply.
pub async fn handle_start_game<N: Notifier>(
    context: &CommandContext,
    master: &GameMaster<N>,
) -> CommandResult {
    debug!(
        "handling startgame command from {} in {}",
        context.user_id, context.room_id
    );

    master.start_session(&context.room_id).await;

    CommandResult { response: None }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::game::MockNotifier;

    #[tokio::test]
    async fn test_handle_start_game() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_message()
            .withf(|room_id, _| room_id == "!room:example.com")
            .times(1)
            .returning(|_, _| Ok("$event".to_string()));
        notifier
            .expect_forget_actions()
            .withf(|room_id| room_id == "!room:example.com")
            .times(1)
            .returning(|_| ());
        let master = GameMaster::new(Arc::new(notifier), Vec::new());

        let context = CommandContext {
            room_id: "!room:example.com".to_string(),
            user_id: "@user:example.com".to_string(),
        };
        let result = handle_start_game(&context, &master).await;

        assert!(result.response.is_none());
    }
}
