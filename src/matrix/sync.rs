//! Matrix client synchronization and event handling.
//!
//! This module provides the [`MatrixSync`] struct for managing the Matrix client's
//! synchronization loop and dispatching real-time events from the homeserver.
//!
//! # Overview
//!
//! The [`MatrixSync::sync`] method:
//! 1. Performs an initial sync to catch up on offline events (especially invites)
//! 2. Sets up event handlers for auto-joining rooms, messages and reactions
//! 3. Enters a continuous sync loop with automatic token persistence
//!
//! Events received during the initial sync are not dispatched: commands sent
//! while the bot was offline are ignored.

use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};
use matrix_sdk::{
    Client, LoopCtrl, Room, RoomState,
    config::SyncSettings,
    ruma::{
        api::client::filter::FilterDefinition,
        events::{
            reaction::OriginalSyncReactionEvent,
            room::{
                member::StrippedRoomMemberEvent,
                message::{MessageType, OriginalSyncRoomMessageEvent},
            },
        },
    },
};
use tokio::time::{Duration, sleep};

use crate::matrix::{IncomingMessage, IncomingReaction, store::SessionStore};

/// Manages Matrix client synchronization and event processing.
pub struct MatrixSync {
    /// The matrix client
    client: Client,
    /// Where sync tokens are persisted
    store: Arc<SessionStore>,
}

impl MatrixSync {
    /// Creates a new MatrixSync instance.
    ///
    /// This does not start the synchronization process; call [`MatrixSync::sync`]
    /// to begin syncing.
    pub fn new(client: &Client, store: Arc<SessionStore>) -> Self {
        MatrixSync {
            client: client.to_owned(),
            store,
        }
    }

    /// Starts the synchronization process and enters an infinite loop.
    ///
    /// # Arguments
    ///
    /// * `on_message` - Callback invoked for each text message in a joined room
    /// * `on_reaction` - Callback invoked for each reaction in a joined room,
    ///   except the bot's own
    ///
    /// # Errors
    ///
    /// Returns an error if the sync loop encounters a fatal error.
    /// Sync token persistence errors are logged but don't stop the sync process.
    pub async fn sync<M, R>(&self, on_message: M, on_reaction: R) -> Result<()>
    where
        M: Fn(IncomingMessage) + Send + Sync + 'static,
        R: Fn(IncomingReaction) + Send + Sync + 'static,
    {
        info!("start syncing");

        // Auto join rooms when invited
        self.client.add_event_handler(auto_join_rooms);

        // Enable room members lazy-loading
        // See <https://spec.matrix.org/v1.6/client-server-api/#lazy-loading-room-members>.
        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());

        if let Some(sync_token) = self.store.sync_token().await {
            sync_settings = sync_settings.token(sync_token);
        }

        // First sync to only get the invitation when the bot is offline
        let mut delay = 1;
        let next_batch = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response.next_batch,
                Err(e) => {
                    error!("initial sync failed ({e}), retrying in {delay}s");
                    sleep(Duration::from_secs(delay)).await;
                    delay = (delay * 2).min(60);
                }
            }
        };
        self.persist_sync_token(next_batch.clone()).await;

        // Handlers are added after the first sync, so only new events reach them
        let on_message = Arc::new(on_message);
        self.client.add_event_handler(
            move |event: OriginalSyncRoomMessageEvent, room: Room| {
                let on_message = Arc::clone(&on_message);
                async move { on_room_message(event, room, on_message.as_ref()) }
            },
        );

        let on_reaction = Arc::new(on_reaction);
        self.client.add_event_handler(
            move |event: OriginalSyncReactionEvent, room: Room, client: Client| {
                let on_reaction = Arc::clone(&on_reaction);
                async move { on_room_reaction(event, room, client, on_reaction.as_ref()) }
            },
        );

        sync_settings = sync_settings.token(next_batch);
        self.client
            .sync_with_result_callback(sync_settings, |sync_result| async move {
                let response = sync_result?;

                // We persist the token each time to be able to restore our session
                self.persist_sync_token(response.next_batch).await;

                Ok(LoopCtrl::Continue)
            })
            .await?;

        Ok(())
    }

    async fn persist_sync_token(&self, sync_token: String) {
        if let Err(err) = self.store.save_sync_token(sync_token).await {
            error!("failed to persist sync token: {:?}", err);
        }
    }
}

/// Automatically joins rooms when the bot receives an invitation.
///
/// See <https://github.com/matrix-org/synapse/issues/4345> for why joining
/// right after the invite may fail and is retried.
async fn auto_join_rooms(room_member: StrippedRoomMemberEvent, client: Client, room: Room) {
    let Some(user_id) = client.user_id() else {
        warn!("could not get user id from client");
        return;
    };

    // Ignore if the invite is not for us
    if room_member.state_key != user_id {
        return;
    }

    tokio::spawn(async move {
        info!("auto joining room {}", room.room_id());
        let mut delay = 2;

        while let Err(err) = room.join().await {
            error!(
                "failed to join room {} ({err:?}), retrying in {delay}s",
                room.room_id()
            );

            sleep(Duration::from_secs(delay)).await;
            delay *= 2;

            if delay > 3600 {
                error!("can't join room {} ({err:?})", room.room_id());
                return;
            }
        }
        info!("successfully joined room {}", room.room_id());
    });
}

/// Forwards text messages of joined rooms. Other message types are ignored.
fn on_room_message<F>(event: OriginalSyncRoomMessageEvent, room: Room, on_message: &F)
where
    F: Fn(IncomingMessage),
{
    if room.state() != RoomState::Joined {
        return;
    }

    let MessageType::Text(text_content) = event.content.msgtype else {
        return;
    };

    on_message(IncomingMessage {
        body: text_content.body,
        room_id: room.room_id().to_string(),
        sender_id: event.sender.to_string(),
        event_id: event.event_id.to_string(),
    });
}

/// Forwards reactions of joined rooms, skipping the ones the bot sent.
fn on_room_reaction<F>(
    event: OriginalSyncReactionEvent,
    room: Room,
    client: Client,
    on_reaction: &F,
)
where
    F: Fn(IncomingReaction),
{
    if room.state() != RoomState::Joined {
        return;
    }

    if client.user_id() == Some(&*event.sender) {
        return;
    }

    let annotation = event.content.relates_to;
    on_reaction(IncomingReaction {
        room_id: room.room_id().to_string(),
        sender_id: event.sender.to_string(),
        reacted_event_id: annotation.event_id.to_string(),
        key: annotation.key,
    });
}
