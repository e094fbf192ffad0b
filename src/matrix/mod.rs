//! Matrix protocol integration for the bot.
//!
//! This module provides the Matrix side of the bot with support for:
//! - End-to-end encryption
//! - Session persistence across restarts
//! - Real-time synchronization of messages and reactions
//! - The game's messaging contract ([`Notifier`](crate::game::Notifier))
//!
//! # Architecture
//!
//! The module is structured around the [`MatrixClient`] which coordinates:
//! - **Login**: Password login, cross-signing and recovery via the login submodule
//! - **Store**: Login and sync tokens persisted by the store submodule
//! - **Sync**: Real-time event handling via the sync submodule
//!
//! # Reveal actions
//!
//! A message carrying an action is sent with a 👀 reaction from the bot. Another
//! user adding a 👀 to that message triggers the action, until the game drops
//! the room's pending actions.

mod actions;
mod client;
mod login;
mod store;
mod sync;

pub use crate::matrix::client::MatrixClient;

/// User credentials for a Matrix account
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// User ID of the matrix account
    pub user_id: String,
    /// Password of the matrix account
    pub password: String,
    /// Passphrase to recover the matrix account secrets
    pub passphrase: String,
}

/// Text message received in a joined room.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub body: String,
    pub room_id: String,
    pub sender_id: String,
    pub event_id: String,
}

/// Reaction added by a user in a joined room.
#[derive(Debug, Clone)]
pub struct IncomingReaction {
    pub room_id: String,
    pub sender_id: String,
    /// Message the reaction was added to
    pub reacted_event_id: String,
    /// Reaction key; only 👀 triggers an action
    pub key: String,
}
