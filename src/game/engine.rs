//! Game engine driving sessions and their notifications.
//!
//! The [`GameMaster`] owns one [`Session`] per room and exposes the operations
//! triggered by players: start, add players, deal roles, reveal, end. After
//! each state change it posts what the room needs to see through its
//! [`Notifier`].
//!
//! # Serialization
//!
//! All sessions sit behind a single async mutex held for the whole operation,
//! notifications included. Commands and reveal taps are therefore applied one
//! at a time, in arrival order, and a double tap can never reveal twice.
//!
//! # Transport failures
//!
//! A notification that fails is logged and the operation carries on: state is
//! never rolled back because a message could not be delivered. The only
//! exception is the private reveal alert, see [`GameMaster::handle_reveal_action`].

use std::{collections::HashMap, sync::Arc};

use log::{debug, error, info};
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tokio::sync::Mutex;

use crate::game::{
    GameError,
    messages::{
        format_game_over, format_game_started, format_player_list, format_reveal_complete,
        format_reveal_turn, format_roles_assigned, format_secret_word,
    },
    notifier::{ActionContext, Notifier, NotifyError},
    role::WordPair,
    session::{RevealPrompt, Session},
};

/// A room's game together with the messaging state tied to it.
struct Table {
    session: Session,
    /// Id of the running "Current players" message, once sent
    player_list_message_id: Option<String>,
}

/// Hosts the games of every room the bot is in.
///
/// # Examples
///
/// ```ignore
/// let master = GameMaster::new(Arc::new(notifier), vec![WordPair::default()]);
///
/// master.start_session("!room:example.com").await;
/// master.add_player("!room:example.com", "Alice").await?;
/// ```
pub struct GameMaster<N: Notifier> {
    notifier: Arc<N>,
    /// Pool the words of each new game are drawn from
    word_pairs: Vec<WordPair>,
    tables: Mutex<HashMap<String, Table>>,
}

impl<N: Notifier> GameMaster<N> {
    /// Creates an engine with no games.
    ///
    /// An empty `word_pairs` pool falls back to [`WordPair::default`].
    pub fn new(notifier: Arc<N>, word_pairs: Vec<WordPair>) -> Self {
        let word_pairs = match word_pairs.is_empty() {
            true => vec![WordPair::default()],
            false => word_pairs,
        };

        GameMaster {
            notifier,
            word_pairs,
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// Starts a new game in the room, replacing any previous one.
    pub async fn start_session(&self, room_id: &str) {
        let words = self
            .word_pairs
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_default();

        let mut tables = self.tables.lock().await;
        if tables.contains_key(room_id) {
            info!("replacing the game of room {}", room_id);
        } else {
            info!("starting a game in room {}", room_id);
        }
        tables.insert(
            room_id.to_owned(),
            Table {
                session: Session::new(words),
                player_list_message_id: None,
            },
        );
        self.notifier.forget_actions(room_id).await;

        log_failure(
            self.notifier
                .send_message(room_id, &format_game_started())
                .await,
            "game started message",
        );
    }

    /// Registers a player and refreshes the running player list.
    ///
    /// The list is sent once per game, then edited in place.
    ///
    /// # Errors
    ///
    /// [`GameError::NoActiveSession`] or [`GameError::MissingPlayerName`].
    pub async fn add_player(&self, room_id: &str, name: &str) -> Result<(), GameError> {
        let mut tables = self.tables.lock().await;
        let table = active_table(&mut tables, room_id)?;

        let player = table.session.add_player(name)?;
        debug!("added player {} ({}) in room {}", player.name, player.id, room_id);

        let list = format_player_list(table.session.players());
        if let Some(message_id) = &table.player_list_message_id {
            log_failure(
                self.notifier
                    .edit_message(room_id, message_id, &list)
                    .await,
                "player list edit",
            );
        } else {
            table.player_list_message_id = log_failure(
                self.notifier.send_message(room_id, &list).await,
                "player list message",
            );
        }

        Ok(())
    }

    /// Deals roles to the registered players.
    ///
    /// Each call draws a fresh generator from the operating system so that
    /// consecutive games are independent.
    ///
    /// # Errors
    ///
    /// [`GameError::NoActiveSession`] or [`GameError::InsufficientPlayers`].
    pub async fn assign_roles(&self, room_id: &str) -> Result<(), GameError> {
        let mut tables = self.tables.lock().await;
        let table = active_table(&mut tables, room_id)?;

        let mut rng = StdRng::from_os_rng();
        table.session.assign_roles(&mut rng)?;
        info!(
            "roles dealt to {} players in room {}",
            table.session.players().len(),
            room_id
        );

        log_failure(
            self.notifier
                .send_message(room_id, &format_roles_assigned())
                .await,
            "roles assigned message",
        );

        Ok(())
    }

    /// Starts the reveal sequence with the first registered player.
    ///
    /// Prompts left over from a previous sequence stop being actionable.
    ///
    /// # Errors
    ///
    /// [`GameError::NoActiveSession`], [`GameError::NoPlayers`] or
    /// [`GameError::RolesNotAssigned`].
    pub async fn begin_reveal(&self, room_id: &str) -> Result<(), GameError> {
        let mut tables = self.tables.lock().await;
        let table = active_table(&mut tables, room_id)?;

        let prompt = table.session.begin_reveal()?;
        // Prompts of an earlier sequence must not be tapped through
        self.notifier.forget_actions(room_id).await;
        self.emit_reveal_prompt(room_id, prompt).await;

        Ok(())
    }

    /// Handles a tap on a reveal action.
    ///
    /// The secret word goes to the tapping user only. The cursor then moves to
    /// the next player and the room gets the next prompt, or the completion
    /// notice after the last player.
    ///
    /// If the private alert cannot be delivered the cursor stays put so the same
    /// player can tap again.
    ///
    /// # Errors
    ///
    /// [`GameError::StaleOrInvalidAction`] for tokens that do not match the
    /// current player. Callers are expected to drop it silently.
    pub async fn handle_reveal_action(
        &self,
        context: &ActionContext,
        token: &str,
    ) -> Result<(), GameError> {
        let mut tables = self.tables.lock().await;
        let table = tables
            .get_mut(&context.room_id)
            .ok_or(GameError::StaleOrInvalidAction)?;

        let revelation = table.session.peek_reveal(token)?;
        debug!(
            "{} reveals the word of player {} in room {}",
            context.user_id, revelation.player.id, context.room_id
        );

        if let Err(e) = self
            .notifier
            .send_private_alert(context, &format_secret_word(&revelation.word))
            .await
        {
            error!("failed to deliver secret word: {}", e);
            return Ok(());
        }

        let prompt = table.session.advance_reveal();
        self.emit_reveal_prompt(&context.room_id, prompt).await;

        Ok(())
    }

    /// Ends the room's game and discloses roles and words.
    ///
    /// # Errors
    ///
    /// [`GameError::NoActiveSession`].
    pub async fn end_session(&self, room_id: &str) -> Result<(), GameError> {
        let mut tables = self.tables.lock().await;
        let table = active_table(&mut tables, room_id)?;

        table.session.end()?;
        info!("game of room {} ended", room_id);
        self.notifier.forget_actions(room_id).await;

        log_failure(
            self.notifier
                .send_message(room_id, &format_game_over(&table.session))
                .await,
            "game over message",
        );

        Ok(())
    }

    async fn emit_reveal_prompt(&self, room_id: &str, prompt: RevealPrompt) {
        match prompt {
            RevealPrompt::Turn { index, name, token } => {
                debug!("prompting player {} ({}) in room {}", index, name, room_id);
                log_failure(
                    self.notifier
                        .send_message_with_action(room_id, &format_reveal_turn(&name), &token)
                        .await,
                    "reveal prompt",
                );
            }
            RevealPrompt::Complete => {
                info!("every player of room {} has seen their word", room_id);
                log_failure(
                    self.notifier
                        .send_message(room_id, &format_reveal_complete())
                        .await,
                    "reveal complete message",
                );
            }
        }
    }

    /// Snapshot of the room's session.
    #[cfg(test)]
    pub async fn session(&self, room_id: &str) -> Option<Session> {
        self.tables
            .lock()
            .await
            .get(room_id)
            .map(|table| table.session.clone())
    }
}

/// Looks up the room's table, refusing missing or ended games.
fn active_table<'a>(
    tables: &'a mut HashMap<String, Table>,
    room_id: &str,
) -> Result<&'a mut Table, GameError> {
    match tables.get_mut(room_id) {
        Some(table) if table.session.is_active() => Ok(table),
        _ => Err(GameError::NoActiveSession),
    }
}

/// Logs a transport failure and turns the result into an option.
fn log_failure<T>(result: Result<T, NotifyError>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!("failed to send {}: {}", what, e);
            None
        }
    }
}
