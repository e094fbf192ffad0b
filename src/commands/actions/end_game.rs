//! End game command handler.

use log::debug;

use crate::{
    commands::{CommandContext, CommandResult},
    game::{GameMaster, Notifier},
};

/// Ends the room's game. The game master posts the roles summary.
pub async fn handle_end_game<N: Notifier>(
    context: &CommandContext,
    master: &GameMaster<N>,
) -> CommandResult {
    debug!(
        "handling endgame command from {} in {}",
        context.user_id, context.room_id
    );

    CommandResult::from_game(master.end_session(&context.room_id).await)
}
