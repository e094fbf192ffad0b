//! Roles and secret words.
//!
//! Every player holds one [`Role`]. The role decides which [`SecretWord`] the
//! player discovers when revealing: civilians and the undercover each get one of
//! the two words of the game's [`WordPair`], Mister White gets nothing and must
//! bluff.

use std::fmt;

use serde::Deserialize;

/// Text shown to Mister White instead of a word.
pub const MISTER_WHITE_HINT: &str = "You are Mister White! Your goal is to guess the correct word!";

/// Role held by a player for the duration of a game.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Role {
    /// Knows the civilian word
    Civilian,
    /// Knows the undercover word, close to but different from the civilian one
    Undercover,
    /// Knows no word at all
    MisterWhite,
}

impl Role {
    /// Builds the role deck for `player_count` players, before shuffling.
    ///
    /// The deck always holds one [`Role::Undercover`], one [`Role::MisterWhite`]
    /// and civilians for every remaining seat. Callers must make sure there are
    /// at least 3 players.
    pub fn deck(player_count: usize) -> Vec<Role> {
        let mut deck = vec![Role::Civilian; player_count.saturating_sub(2)];
        deck.push(Role::Undercover);
        deck.push(Role::MisterWhite);
        deck
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Civilian => "Civilian",
            Role::Undercover => "Undercover",
            Role::MisterWhite => "Mister White",
        };
        f.write_str(label)
    }
}

/// The two words of a game.
///
/// Deserializes from a two-element YAML sequence, e.g. `["Sun", "Moon"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "[String; 2]")]
pub struct WordPair {
    /// Word given to civilians
    pub civilian: String,
    /// Word given to the undercover player
    pub undercover: String,
}

impl WordPair {
    /// Builds a pair from two words, trimmed of surrounding whitespace.
    pub fn new(civilian: &str, undercover: &str) -> Self {
        WordPair {
            civilian: civilian.trim().to_owned(),
            undercover: undercover.trim().to_owned(),
        }
    }

    /// A pair is playable when both words are set and differ from each other.
    ///
    /// Neither word may be the Mister White hint, which would hand Mister
    /// White a pool word.
    pub fn is_playable(&self) -> bool {
        let words = [self.civilian.as_str(), self.undercover.as_str()];
        words
            .iter()
            .all(|word| !word.is_empty() && *word != MISTER_WHITE_HINT)
            && self.civilian != self.undercover
    }

    /// Returns what a player holding `role` gets to see.
    pub fn word_for(&self, role: Role) -> SecretWord {
        match role {
            Role::Civilian => SecretWord::Word(self.civilian.clone()),
            Role::Undercover => SecretWord::Word(self.undercover.clone()),
            Role::MisterWhite => SecretWord::MisterWhite,
        }
    }
}

impl Default for WordPair {
    fn default() -> Self {
        WordPair::new("Sun", "Moon")
    }
}

impl From<[String; 2]> for WordPair {
    fn from([civilian, undercover]: [String; 2]) -> Self {
        WordPair::new(&civilian, &undercover)
    }
}

/// What a player discovers when revealing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretWord {
    /// One of the two words of the pair
    Word(String),
    /// No word, only the instruction to bluff
    MisterWhite,
}

impl fmt::Display for SecretWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretWord::Word(word) => f.write_str(word),
            SecretWord::MisterWhite => f.write_str(MISTER_WHITE_HINT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_for_three_players() {
        let deck = Role::deck(3);
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.iter().filter(|r| **r == Role::Civilian).count(), 1);
        assert_eq!(deck.iter().filter(|r| **r == Role::Undercover).count(), 1);
        assert_eq!(deck.iter().filter(|r| **r == Role::MisterWhite).count(), 1);
    }

    #[test]
    fn test_deck_for_eight_players() {
        let deck = Role::deck(8);
        assert_eq!(deck.len(), 8);
        assert_eq!(deck.iter().filter(|r| **r == Role::Civilian).count(), 6);
    }

    #[test]
    fn test_word_for_each_role() {
        let pair = WordPair::default();
        assert_eq!(
            pair.word_for(Role::Civilian),
            SecretWord::Word("Sun".to_string())
        );
        assert_eq!(
            pair.word_for(Role::Undercover),
            SecretWord::Word("Moon".to_string())
        );
        assert_eq!(pair.word_for(Role::MisterWhite), SecretWord::MisterWhite);
    }

    #[test]
    fn test_mister_white_never_sees_a_pool_word() {
        let pair = WordPair::new("Coffee", "Tea");
        let shown = pair.word_for(Role::MisterWhite).to_string();
        assert_eq!(shown, MISTER_WHITE_HINT);
        assert_ne!(shown, "Coffee");
        assert_ne!(shown, "Tea");
    }

    #[test]
    fn test_is_playable() {
        assert!(WordPair::new("Sun", "Moon").is_playable());
        assert!(!WordPair::new("Sun", "Sun").is_playable());
        assert!(!WordPair::new("Sun", " ").is_playable());
        assert!(!WordPair::new("", "Moon").is_playable());
    }

    #[test]
    fn test_words_are_stored_trimmed() {
        let pair = WordPair::from([" Sun".to_string(), "Moon \n".to_string()]);
        assert_eq!(pair, WordPair::new("Sun", "Moon"));
        assert_eq!(
            pair.word_for(Role::Civilian),
            SecretWord::Word("Sun".to_string())
        );
        assert!(!WordPair::new(" Sun ", "Sun").is_playable());
    }

    #[test]
    fn test_hint_is_not_a_playable_word() {
        assert!(!WordPair::new(MISTER_WHITE_HINT, "Moon").is_playable());
        assert!(!WordPair::new("Sun", MISTER_WHITE_HINT).is_playable());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::MisterWhite.to_string(), "Mister White");
        assert_eq!(Role::Undercover.to_string(), "Undercover");
    }
}
