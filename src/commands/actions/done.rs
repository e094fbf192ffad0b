//! Done command handler.
//!
//! Closes registration and deals the roles.

use log::debug;

use crate::{
    commands::{CommandContext, CommandResult},
    game::{GameMaster, Notifier},
};

/// Deals roles to the players of the room's game.
pub async fn handle_done<N: Notifier>(
    context: &CommandContext,
    master: &GameMaster<N>,
) -> CommandResult {
    debug!("handling done command in {}", context.room_id);

    CommandResult::from_game(master.assign_roles(&context.room_id).await)
}
