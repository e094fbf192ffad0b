//! Outbound messaging contract of the game engine.
//!
//! The engine never talks to the chat platform directly. It asks a [`Notifier`]
//! to send, edit and decorate messages, and to whisper secret words to the
//! player who tapped a reveal action. Actions of a room stay live until the
//! engine asks the transport to forget them.

use mockall::automock;
use thiserror::Error;

/// Who triggered a one-tap action, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    /// Room holding the message the action was attached to
    pub room_id: String,
    /// User who tapped the action
    pub user_id: String,
}

/// Failure reported by the transport.
///
/// Never shown to players, only logged.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("room {0} is unknown to the client")]
    UnknownRoom(String),
    #[error("invalid identifier: {0}")]
    InvalidId(String),
    #[error("transport error: {0}")]
    Transport(#[from] anyhow::Error),
}

/// Messaging operations the engine relies on.
///
/// Message identifiers are opaque strings chosen by the transport.
#[automock]
pub trait Notifier {
    /// Posts `body` in the room and returns the new message id.
    async fn send_message(&self, room_id: &str, body: &str) -> Result<String, NotifyError>;
    /// Replaces the text of a message previously sent by the bot.
    async fn edit_message(
        &self,
        room_id: &str,
        message_id: &str,
        body: &str,
    ) -> Result<(), NotifyError>;
    /// Posts `body` with a one-tap action; tapping it delivers `action_token` back to the bot.
    async fn send_message_with_action(
        &self,
        room_id: &str,
        body: &str,
        action_token: &str,
    ) -> Result<String, NotifyError>;
    /// Shows `body` to the user behind `context` only.
    async fn send_private_alert(
        &self,
        context: &ActionContext,
        body: &str,
    ) -> Result<(), NotifyError>;
    /// Disables every action previously sent in the room.
    async fn forget_actions(&self, room_id: &str);
}
