//! State machine of a single game.
//!
//! A [`Session`] records the players of one game, their roles, the word pair
//! and the progress of the reveal sequence. It knows nothing about messaging:
//! every operation either mutates the state and tells the caller what to
//! announce, or returns a [`GameError`].
//!
//! # Lifecycle
//!
//! ```text
//! CollectingPlayers ⇄ RolesAssigned → Revealing → RevealComplete
//!         │                 │             │              │
//!         └─────────────────┴──── end() ──┴──────────────┴──→ Ended
//! ```
//!
//! Adding a player after roles were assigned drops the assignment and goes back
//! to `CollectingPlayers`. `begin_reveal` can be called again from
//! `RevealComplete` to run the sequence once more.

use std::collections::HashMap;

use log::debug;
use rand::{Rng, seq::SliceRandom};

use crate::game::{
    GameError,
    role::{Role, SecretWord, WordPair},
};

/// Minimum number of players needed to deal roles.
pub const MIN_PLAYERS: usize = 3;

/// Prefix of reveal action tokens, followed by the player index.
const REVEAL_TOKEN_PREFIX: &str = "reveal_";

/// A registered player.
///
/// Display names are free text and may repeat, the `id` is what identifies a
/// player. Ids follow registration order starting at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: usize,
    pub name: String,
}

/// Where a session stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Players are being registered, no roles yet
    CollectingPlayers,
    /// Roles are dealt, nobody has revealed yet
    RolesAssigned,
    /// Players are revealing one after the other
    Revealing,
    /// Every player has seen their word
    RevealComplete,
    /// The game was ended, the session only answers `NoActiveSession`
    Ended,
}

/// What to announce after the reveal cursor moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealPrompt {
    /// `name` must reveal next, using the attached action token
    Turn {
        index: usize,
        name: String,
        token: String,
    },
    /// Everybody has seen their word
    Complete,
}

/// Result of an accepted reveal action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revelation {
    /// Player who revealed
    pub player: Player,
    /// What the player is allowed to see
    pub word: SecretWord,
}

/// Builds the action token bound to the reveal prompt of player `index`.
pub fn reveal_token(index: usize) -> String {
    format!("{}{}", REVEAL_TOKEN_PREFIX, index)
}

/// Extracts the player index from a reveal action token.
///
/// Returns `None` when the token is not of the form `reveal_<index>`.
pub fn parse_reveal_token(token: &str) -> Option<usize> {
    token.strip_prefix(REVEAL_TOKEN_PREFIX)?.parse().ok()
}

/// One game: players, roles, words and reveal progress.
#[derive(Debug, Clone)]
pub struct Session {
    players: Vec<Player>,
    roles: HashMap<usize, Role>,
    words: WordPair,
    phase: Phase,
    reveal_cursor: usize,
}

impl Session {
    /// Creates an active session with no players.
    pub fn new(words: WordPair) -> Self {
        Session {
            players: Vec::new(),
            roles: HashMap::new(),
            words,
            phase: Phase::CollectingPlayers,
            reveal_cursor: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Ended
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn words(&self) -> &WordPair {
        &self.words
    }

    #[cfg(test)]
    pub fn reveal_cursor(&self) -> usize {
        self.reveal_cursor
    }

    /// Role of the player with the given id, if roles were dealt.
    pub fn role_of(&self, player_id: usize) -> Option<Role> {
        self.roles.get(&player_id).copied()
    }

    fn ensure_active(&self) -> Result<(), GameError> {
        if !self.is_active() {
            return Err(GameError::NoActiveSession);
        }
        Ok(())
    }

    /// Registers a player at the end of the list.
    ///
    /// The name is trimmed; duplicates are accepted and get their own id. A
    /// previous role assignment is discarded because the new player would not
    /// have a role.
    pub fn add_player(&mut self, name: &str) -> Result<&Player, GameError> {
        self.ensure_active()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::MissingPlayerName);
        }

        if !self.roles.is_empty() {
            debug!("player added after roles were dealt, dropping assignment");
            self.roles.clear();
        }
        self.phase = Phase::CollectingPlayers;
        self.reveal_cursor = 0;

        let id = self.players.len();
        self.players.push(Player {
            id,
            name: name.to_owned(),
        });

        Ok(&self.players[id])
    }

    /// Deals one role to every player.
    ///
    /// The deck from [`Role::deck`] is shuffled with `rng` then dealt in
    /// registration order. On error the previous assignment is kept.
    pub fn assign_roles<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        self.ensure_active()?;

        let count = self.players.len();
        if count < MIN_PLAYERS {
            return Err(GameError::InsufficientPlayers { count });
        }

        let mut deck = Role::deck(count);
        deck.shuffle(rng);

        self.roles = self
            .players
            .iter()
            .zip(deck)
            .map(|(player, role)| (player.id, role))
            .collect();
        self.phase = Phase::RolesAssigned;
        self.reveal_cursor = 0;

        debug!("dealt {} roles", count);
        Ok(())
    }

    /// Starts (or restarts) the reveal sequence from the first player.
    pub fn begin_reveal(&mut self) -> Result<RevealPrompt, GameError> {
        self.ensure_active()?;

        if self.players.is_empty() {
            return Err(GameError::NoPlayers);
        }
        if self.roles.is_empty() {
            return Err(GameError::RolesNotAssigned);
        }

        self.reveal_cursor = 0;
        self.phase = Phase::Revealing;
        Ok(self.next_prompt())
    }

    /// Computes the prompt for the current cursor position.
    ///
    /// Reaching the end of the list moves the session to
    /// [`Phase::RevealComplete`]; the cursor stays at `players.len()`.
    fn next_prompt(&mut self) -> RevealPrompt {
        match self.players.get(self.reveal_cursor) {
            Some(player) => RevealPrompt::Turn {
                index: self.reveal_cursor,
                name: player.name.clone(),
                token: reveal_token(self.reveal_cursor),
            },
            None => {
                self.phase = Phase::RevealComplete;
                RevealPrompt::Complete
            }
        }
    }

    /// Checks a reveal action token against the cursor without changing anything.
    ///
    /// Tokens that do not parse, that arrive outside of a reveal sequence or that
    /// point to another player than the current one are
    /// [`GameError::StaleOrInvalidAction`].
    pub fn peek_reveal(&self, token: &str) -> Result<Revelation, GameError> {
        if self.phase != Phase::Revealing {
            return Err(GameError::StaleOrInvalidAction);
        }

        let index = parse_reveal_token(token).ok_or(GameError::StaleOrInvalidAction)?;
        if index != self.reveal_cursor {
            return Err(GameError::StaleOrInvalidAction);
        }

        let player = self
            .players
            .get(index)
            .ok_or(GameError::StaleOrInvalidAction)?;
        let role = self
            .role_of(player.id)
            .ok_or(GameError::StaleOrInvalidAction)?;

        Ok(Revelation {
            player: player.clone(),
            word: self.words.word_for(role),
        })
    }

    /// Moves the cursor past the current player and returns the next prompt.
    ///
    /// Must only be called after a successful [`Session::peek_reveal`].
    pub fn advance_reveal(&mut self) -> RevealPrompt {
        if self.phase == Phase::Revealing && self.reveal_cursor < self.players.len() {
            self.reveal_cursor += 1;
        }
        self.next_prompt()
    }

    /// Accepts a reveal action: checks it, then moves to the next player.
    #[cfg(test)]
    pub fn reveal(&mut self, token: &str) -> Result<(Revelation, RevealPrompt), GameError> {
        let revelation = self.peek_reveal(token)?;
        let prompt = self.advance_reveal();
        Ok((revelation, prompt))
    }

    /// Ends the game. The session stays around only to answer `NoActiveSession`.
    pub fn end(&mut self) -> Result<(), GameError> {
        self.ensure_active()?;
        self.phase = Phase::Ended;
        Ok(())
    }
}
