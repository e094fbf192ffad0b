//! Action tokens of the messages sent with an action.
//!
//! Tokens are kept per room so a room's pending actions can be dropped at once
//! when its game moves on. A reaction only resolves while its message is still
//! registered, which keeps taps on old prompts from reaching the game.

use std::collections::HashMap;

use crate::matrix::IncomingReaction;

/// Reaction the bot puts on messages carrying an action.
pub const ACTION_REACTION: &str = "👀";

/// Action tokens by room id, then by event id of the message carrying them.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    rooms: HashMap<String, HashMap<String, String>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `token` to the message `event_id` of `room_id`.
    pub fn register(&mut self, room_id: &str, event_id: &str, token: &str) {
        self.rooms
            .entry(room_id.to_owned())
            .or_default()
            .insert(event_id.to_owned(), token.to_owned());
    }

    /// Returns the token triggered by a reaction.
    ///
    /// `None` unless the reaction is a 👀 on a message registered in the same
    /// room.
    pub fn resolve(&self, reaction: &IncomingReaction) -> Option<String> {
        if !is_action_key(&reaction.key) {
            return None;
        }

        self.rooms
            .get(&reaction.room_id)?
            .get(&reaction.reacted_event_id)
            .cloned()
    }

    /// Drops every token registered in `room_id`.
    pub fn forget(&mut self, room_id: &str) {
        self.rooms.remove(room_id);
    }
}

/// Clients may append a variation selector to the emoji.
fn is_action_key(key: &str) -> bool {
    key.trim_end_matches('\u{fe0f}') == ACTION_REACTION
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction(room_id: &str, event_id: &str, key: &str) -> IncomingReaction {
        IncomingReaction {
            room_id: room_id.to_owned(),
            sender_id: "@alice:example.org".to_owned(),
            reacted_event_id: event_id.to_owned(),
            key: key.to_owned(),
        }
    }

    #[test]
    fn test_resolve_registered_action() {
        let mut registry = ActionRegistry::new();
        registry.register("!room:example.org", "$prompt", "reveal_0");

        assert_eq!(
            registry.resolve(&reaction("!room:example.org", "$prompt", "👀")),
            Some("reveal_0".to_owned())
        );
        assert_eq!(
            registry.resolve(&reaction("!room:example.org", "$prompt", "👀\u{fe0f}")),
            Some("reveal_0".to_owned())
        );
        assert_eq!(
            registry.resolve(&reaction("!room:example.org", "$other", "👀")),
            None
        );
    }

    #[test]
    fn test_stale_prompt_does_not_resolve_after_forget() {
        let mut registry = ActionRegistry::new();
        registry.register("!room:example.org", "$old_prompt", "reveal_0");

        // A new reveal sequence starts in the room
        registry.forget("!room:example.org");
        registry.register("!room:example.org", "$new_prompt", "reveal_0");

        assert_eq!(
            registry.resolve(&reaction("!room:example.org", "$old_prompt", "👀")),
            None
        );
        assert_eq!(
            registry.resolve(&reaction("!room:example.org", "$new_prompt", "👀")),
            Some("reveal_0".to_owned())
        );
    }

    #[test]
    fn test_forget_keeps_other_rooms() {
        let mut registry = ActionRegistry::new();
        registry.register("!a:example.org", "$prompt_a", "reveal_1");
        registry.register("!b:example.org", "$prompt_b", "reveal_2");

        registry.forget("!a:example.org");

        assert_eq!(
            registry.resolve(&reaction("!a:example.org", "$prompt_a", "👀")),
            None
        );
        assert_eq!(
            registry.resolve(&reaction("!b:example.org", "$prompt_b", "👀")),
            Some("reveal_2".to_owned())
        );
    }

    #[test]
    fn test_resolve_requires_matching_room() {
        let mut registry = ActionRegistry::new();
        registry.register("!a:example.org", "$prompt", "reveal_0");

        assert_eq!(
            registry.resolve(&reaction("!b:example.org", "$prompt", "👀")),
            None
        );
    }

    #[test]
    fn test_other_reactions_are_ignored() {
        let mut registry = ActionRegistry::new();
        registry.register("!room:example.org", "$prompt", "reveal_0");

        assert_eq!(
            registry.resolve(&reaction("!room:example.org", "$prompt", "👍")),
            None
        );
        assert_eq!(
            registry.resolve(&reaction("!room:example.org", "$prompt", "")),
            None
        );
    }
}
