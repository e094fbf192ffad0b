//! Undercover game engine.
//!
//! This module implements the rules of the game and sequences what players see,
//! independently of the chat platform.
//!
//! # Overview
//!
//! A game goes through four steps:
//!
//! 1. **Start**: a room opens a new game, replacing any previous one
//! 2. **Registration**: players are added by name, the bot keeps one running list
//! 3. **Deal**: with at least 3 players, roles are shuffled and dealt: one
//!    Undercover, one Mister White, civilians for everybody else
//! 4. **Reveal**: players are prompted one at a time; tapping the prompt's action
//!    privately shows the word matching the player's role
//!
//! # Modules
//!
//! - `engine` - [`GameMaster`], the per-room engine emitting notifications
//! - `messages` - Texts posted during a game
//! - `notifier` - [`Notifier`], the messaging contract implemented by the transport
//! - `role` - Roles, word pairs and what each role gets to see
//! - `session` - State machine of a single game

use thiserror::Error;

mod engine;
mod messages;
mod notifier;
mod role;
mod session;

pub use crate::game::engine::GameMaster;
pub use crate::game::notifier::{ActionContext, Notifier, NotifyError};
pub use crate::game::role::WordPair;

#[cfg(test)]
pub use crate::game::notifier::MockNotifier;

/// Errors returned by game operations.
///
/// All of them are recoverable: the game stays as it was and the player is told
/// what went wrong, except for [`GameError::StaleOrInvalidAction`] which is
/// expected traffic (old reveal prompts) and dropped silently.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// No game was started in the room, or it was ended
    #[error("no active game")]
    NoActiveSession,
    /// `addplayer` without a name
    #[error("missing player name")]
    MissingPlayerName,
    /// Fewer than 3 players when dealing roles
    #[error("not enough players: {count}")]
    InsufficientPlayers { count: usize },
    /// Reveal requested before anybody joined
    #[error("no players to reveal words for")]
    NoPlayers,
    /// Reveal requested before roles were dealt
    #[error("roles not assigned")]
    RolesNotAssigned,
    /// Reveal action that does not match the player whose turn it is
    #[error("stale or invalid reveal action")]
    StaleOrInvalidAction,
}
