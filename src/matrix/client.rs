//! Matrix client wrapper for bot messaging and synchronization.
//!
//! This module provides a high-level [`MatrixClient`] interface that wraps the
//! Matrix SDK client. It implements the game's [`Notifier`] on top of Matrix:
//!
//! | Notifier operation | Matrix rendering |
//! |--------------------|------------------|
//! | `send_message` | Markdown room message |
//! | `edit_message` | Replacement event (`m.replace`) |
//! | `send_message_with_action` | Room message the bot reacts to with 👀 |
//! | `send_private_alert` | Message in the direct chat with the user |
//! | `forget_actions` | Drops the room's pending actions |

use std::{path::Path, sync::Arc};

use log::{debug, error, info, warn};
use matrix_sdk::{
    Client, Room, RoomState,
    ruma::{
        EventId, OwnedEventId, RoomId, UserId,
        events::{
            reaction::ReactionEventContent,
            relation::Annotation,
            room::member::MembershipState,
            room::message::{
                AddMentions, ForwardThread, MessageType, ReplacementMetadata, ReplyMetadata,
                RoomMessageEventContent, RoomMessageEventContentWithoutRelation,
            },
        },
    },
};
use tokio::sync::Mutex;

use crate::{
    game::{ActionContext, Notifier, NotifyError},
    matrix::{
        IncomingMessage, IncomingReaction, UserCredentials,
        actions::{ACTION_REACTION, ActionRegistry},
        login::connect,
        store::SessionStore,
        sync::MatrixSync,
    },
};

const DISPLAY_NAME: &str = "Undercover";

/// High-level Matrix client for bot messaging operations.
pub struct MatrixClient {
    /// Synchronization service for handling real-time events
    matrix_sync: MatrixSync,
    /// Underlying Matrix SDK client
    client: Client,
    /// Pending actions of every room
    actions: Mutex<ActionRegistry>,
}

impl MatrixClient {
    /// Creates and initializes a new Matrix client with full encryption setup.
    ///
    /// # Arguments
    ///
    /// * `user_credentials` - User credentials containing user ID, password, and passphrase
    /// * `session_dir` - Directory storing the session file and the SQLite store
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be used, or if login or
    /// encryption setup fails.
    pub async fn new(
        user_credentials: &UserCredentials,
        session_dir: &Path,
    ) -> Result<Self, anyhow::Error> {
        let store = Arc::new(SessionStore::open(session_dir).await?);
        let client = connect(user_credentials, &store).await?;

        if let Err(e) = client.account().set_display_name(Some(DISPLAY_NAME)).await {
            warn!("failed to set display name: {:?}", e);
        }

        let matrix_sync = MatrixSync::new(&client, store);

        Ok(MatrixClient {
            matrix_sync,
            client,
            actions: Mutex::new(ActionRegistry::new()),
        })
    }

    /// Starts the Matrix synchronization loop.
    ///
    /// Runs until the sync ends, which does not happen under normal operation.
    ///
    /// # Arguments
    ///
    /// * `on_message` - Callback invoked for each text message
    /// * `on_reaction` - Callback invoked for each reaction from another user
    pub async fn sync<M, R>(&self, on_message: M, on_reaction: R)
    where
        M: Fn(IncomingMessage) + Send + Sync + 'static,
        R: Fn(IncomingReaction) + Send + Sync + 'static,
    {
        match self.matrix_sync.sync(on_message, on_reaction).await {
            Ok(_) => info!("matrix sync ended successfully"),
            Err(e) => error!("matrix sync ended with error: {:?}", e),
        }
    }

    /// Returns the action token triggered by a reaction.
    ///
    /// `None` when the reacted message carries no pending action, e.g. a
    /// regular chat message or a prompt from a previous reveal sequence.
    pub async fn resolve_action(&self, reaction: &IncomingReaction) -> Option<String> {
        self.actions.lock().await.resolve(reaction)
    }

    /// Sends a reply to a specific message. Failures are logged.
    ///
    /// # Arguments
    ///
    /// * `room_id` - The Matrix room ID where the reply should be sent
    /// * `sender_id` - The user ID of the original message sender
    /// * `event_id` - The event ID of the message being replied to
    /// * `body` - The reply content (supports Markdown formatting)
    pub async fn send_reply(&self, room_id: &str, sender_id: &str, event_id: &str, body: &str) {
        let (Ok(sender), Ok(event)) = (UserId::parse(sender_id), EventId::parse(event_id)) else {
            error!("cannot reply to {} from {}: invalid id", event_id, sender_id);
            return;
        };

        let content = RoomMessageEventContent::text_markdown(body).make_reply_to(
            ReplyMetadata::new(&event, &sender, None),
            ForwardThread::No,
            AddMentions::No,
        );

        if let Err(e) = self.send(room_id, content).await {
            error!("failed to send reply: {}", e);
        }
    }

    /// Sends message content to a room and returns its event id.
    async fn send(
        &self,
        room_id: &str,
        content: RoomMessageEventContent,
    ) -> Result<OwnedEventId, NotifyError> {
        let room = self.room(room_id)?;
        send_in(&room, content).await
    }

    fn room(&self, room_id: &str) -> Result<Room, NotifyError> {
        let room_id_obj =
            RoomId::parse(room_id).map_err(|_| NotifyError::InvalidId(room_id.to_owned()))?;

        self.client
            .get_room(&room_id_obj)
            .ok_or_else(|| NotifyError::UnknownRoom(room_id.to_owned()))
    }

    /// Direct chat with the user, created when none can reach them.
    async fn direct_room(&self, user_id: &str) -> Result<Room, NotifyError> {
        let user =
            UserId::parse(user_id).map_err(|_| NotifyError::InvalidId(user_id.to_owned()))?;

        if let Some(room) = self.client.get_dm_room(&user) {
            let member = match room.state() {
                RoomState::Joined => room
                    .get_member_no_sync(&user)
                    .await
                    .map_err(|e| NotifyError::Transport(e.into()))?,
                _ => None,
            };

            if is_reachable(member.as_ref().map(|m| m.membership())) {
                return Ok(room);
            }
            debug!("{} is not in direct chat {}", user_id, room.room_id());
        }

        debug!("creating direct chat with {}", user_id);
        self.client
            .create_dm(&user)
            .await
            .map_err(|e| NotifyError::Transport(e.into()))
    }
}

/// Whether a member with this membership receives the room's messages.
fn is_reachable(membership: Option<&MembershipState>) -> bool {
    matches!(
        membership,
        Some(MembershipState::Join) | Some(MembershipState::Invite)
    )
}

async fn send_in(
    room: &Room,
    content: RoomMessageEventContent,
) -> Result<OwnedEventId, NotifyError> {
    let result = room
        .send(content)
        .await
        .map_err(|e| NotifyError::Transport(e.into()))?;

    Ok(result.event_id)
}

impl Notifier for MatrixClient {
    async fn send_message(&self, room_id: &str, body: &str) -> Result<String, NotifyError> {
        let event_id = self
            .send(room_id, RoomMessageEventContent::text_markdown(body))
            .await?;

        Ok(event_id.to_string())
    }

    async fn edit_message(
        &self,
        room_id: &str,
        message_id: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let event_id = EventId::parse(message_id)
            .map_err(|_| NotifyError::InvalidId(message_id.to_owned()))?;

        let content = RoomMessageEventContentWithoutRelation::new(MessageType::text_markdown(body))
            .make_replacement(ReplacementMetadata::new(event_id, None));

        self.send(room_id, content).await?;
        Ok(())
    }

    async fn send_message_with_action(
        &self,
        room_id: &str,
        body: &str,
        action_token: &str,
    ) -> Result<String, NotifyError> {
        let room = self.room(room_id)?;
        let event_id = send_in(&room, RoomMessageEventContent::text_markdown(body)).await?;

        self.actions
            .lock()
            .await
            .register(room_id, event_id.as_str(), action_token);

        // Players can still add the reaction themselves if this one is missing
        let reaction = ReactionEventContent::new(Annotation::new(
            event_id.clone(),
            ACTION_REACTION.to_owned(),
        ));
        if let Err(e) = room.send(reaction).await {
            warn!("failed to add action reaction on {}: {:?}", event_id, e);
        }

        Ok(event_id.to_string())
    }

    async fn send_private_alert(
        &self,
        context: &ActionContext,
        body: &str,
    ) -> Result<(), NotifyError> {
        let room = self.direct_room(&context.user_id).await?;
        send_in(&room, RoomMessageEventContent::text_markdown(body)).await?;

        debug!("private alert sent to {}", context.user_id);
        Ok(())
    }

    async fn forget_actions(&self, room_id: &str) {
        self.actions.lock().await.forget(room_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_or_invited_user_is_reachable() {
        assert!(is_reachable(Some(&MembershipState::Join)));
        assert!(is_reachable(Some(&MembershipState::Invite)));
    }

    #[test]
    fn test_departed_user_is_not_reachable() {
        assert!(!is_reachable(Some(&MembershipState::Leave)));
        assert!(!is_reachable(Some(&MembershipState::Ban)));
        assert!(!is_reachable(Some(&MembershipState::Knock)));
        assert!(!is_reachable(None));
    }
}
