//! Texts posted by the game engine.
//!
//! Every message of the game flow is built here so wording stays in one place.
//! Messages are Markdown, rendered by the transport.

use crate::game::{
    role::{Role, SecretWord},
    session::{Player, Session},
};

pub fn format_game_started() -> String {
    "Game started! Use `!undercover addplayer <name>` to add players.".to_owned()
}

/// Formats the running list of registered players.
///
/// Players are numbered from 1 in registration order.
///
/// # Examples
///
/// ```ignore
/// let list = format_player_list(session.players());
/// assert_eq!(list, "Current players:\n1. Alice\n2. Bob");
/// ```
pub fn format_player_list(players: &[Player]) -> String {
    let lines = players
        .iter()
        .enumerate()
        .map(|(i, player)| format!("{}. {}", i + 1, escape_markdown(&player.name)))
        .collect::<Vec<String>>()
        .join("\n");

    format!("Current players:\n{}", lines)
}

pub fn format_roles_assigned() -> String {
    "Roles assigned! Use `!undercover reveal` to reveal words.".to_owned()
}

/// Prompt asking `name` to take the phone and tap the reveal action.
pub fn format_reveal_turn(name: &str) -> String {
    format!(
        "It's **{}**'s turn. Pass the phone to them, then tap 👀 to reveal your word.",
        escape_markdown(name)
    )
}

pub fn format_reveal_complete() -> String {
    "All players have seen their words. Game ready to start!".to_owned()
}

/// Private message carrying a player's secret word.
pub fn format_secret_word(word: &SecretWord) -> String {
    format!("Your word is: {}", word)
}

/// Final message of a game, disclosing words and roles.
///
/// When roles were never dealt only the words are shown.
pub fn format_game_over(session: &Session) -> String {
    let words = session.words();
    let header = format!(
        "Game over! Civilians had **{}**, the undercover had **{}**.",
        words.civilian, words.undercover
    );

    let roles = session
        .players()
        .iter()
        .filter_map(|player| {
            session.role_of(player.id).map(|role| {
                format!("- {}: {}", escape_markdown(&player.name), format_role(role))
            })
        })
        .collect::<Vec<String>>();

    if roles.is_empty() {
        return header;
    }

    format!("{}\n\n{}", header, roles.join("\n"))
}

/// Escapes Markdown control characters so player names render as typed.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '`' | '*' | '_' | '{' | '}' | '[' | ']' | '(' | ')' | '#' | '+' | '-' | '.'
                | '!' | '|' | '<' | '>' | '~'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn format_role(role: Role) -> String {
    match role {
        Role::MisterWhite => format!("**{}**", role),
        _ => role.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::game::role::{MISTER_WHITE_HINT, WordPair};

    #[test]
    fn test_format_player_list() {
        let players = vec![
            Player {
                id: 0,
                name: "Alice".to_string(),
            },
            Player {
                id: 1,
                name: "Bob".to_string(),
            },
        ];
        assert_eq!(
            format_player_list(&players),
            "Current players:\n1. Alice\n2. Bob"
        );
    }

    #[test]
    fn test_format_player_list_double_digits() {
        let players: Vec<Player> = (0..11)
            .map(|id| Player {
                id,
                name: format!("p{}", id),
            })
            .collect();
        assert!(format_player_list(&players).ends_with("\n11. p10"));
    }

    #[test]
    fn test_format_reveal_turn() {
        assert!(format_reveal_turn("Alice").contains("**Alice**'s turn"));
    }

    #[test]
    fn test_player_names_are_escaped() {
        let players = vec![
            Player {
                id: 0,
                name: "**x**".to_string(),
            },
            Player {
                id: 1,
                name: "# big".to_string(),
            },
        ];
        assert_eq!(
            format_player_list(&players),
            "Current players:\n1. \\*\\*x\\*\\*\n2. \\# big"
        );
        assert!(format_reveal_turn("_Bob_").contains("**\\_Bob\\_**'s turn"));
    }

    #[test]
    fn test_escape_markdown_keeps_plain_names() {
        assert_eq!(escape_markdown("Mary Jane"), "Mary Jane");
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_format_secret_word() {
        assert_eq!(
            format_secret_word(&SecretWord::Word("Sun".to_string())),
            "Your word is: Sun"
        );
        assert_eq!(
            format_secret_word(&SecretWord::MisterWhite),
            format!("Your word is: {}", MISTER_WHITE_HINT)
        );
    }

    #[test]
    fn test_format_game_over_without_roles() {
        let session = Session::new(WordPair::default());
        assert_eq!(
            format_game_over(&session),
            "Game over! Civilians had **Sun**, the undercover had **Moon**."
        );
    }

    #[test]
    fn test_format_game_over_with_roles() {
        let mut session = Session::new(WordPair::default());
        for name in ["Alice", "Bob", "Carol"] {
            session.add_player(name).unwrap();
        }
        session.assign_roles(&mut StdRng::seed_from_u64(3)).unwrap();

        let message = format_game_over(&session);
        assert!(message.contains("- Alice: "));
        assert!(message.contains("- Bob: "));
        assert!(message.contains("- Carol: "));
        assert!(message.contains("**Mister White**"));
        assert!(message.contains("Undercover"));
        assert!(message.contains("Civilian"));
    }
}
