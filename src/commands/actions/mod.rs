//! Command action handlers.
//!
//! Individual handler functions for each bot command. Each handler receives a
//! [`CommandContext`](crate::commands::CommandContext), forwards the command to
//! the [`GameMaster`](crate::game::GameMaster), and returns a
//! [`CommandResult`](crate::commands::CommandResult).
//!
//! # Available Handlers
//!
//! - [`handle_help`] - Display help information
//! - [`handle_start_game`] - Start a new game in the room
//! - [`handle_add_player`] - Register a player
//! - [`handle_done`] - Deal the roles
//! - [`handle_reveal`] - Start the reveal sequence
//! - [`handle_end_game`] - End the game and disclose roles

mod add_player;
mod done;
mod end_game;
mod help;
mod reveal;
mod start_game;

pub use crate::commands::actions::{
    add_player::handle_add_player, done::handle_done, end_game::handle_end_game,
    help::handle_help, reveal::handle_reveal, start_game::handle_start_game,
};
