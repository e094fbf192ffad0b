//! Configuration file structures for the Undercover bot.
//!
//! The configuration is read from a YAML file, then overridden by environment
//! variables. It is split into two sections: Matrix account settings and game
//! settings.
//!
//! # Configuration File Format
//!
//! ```yaml
//! # Matrix Account Configuration
//! matrix:
//!   # Fully qualified Matrix user ID for the bot account
//!   user_id: "@undercover:matrix.org"
//!   # Matrix account password
//!   password: "secret-password"
//!   # E2EE recovery passphrase
//!   passphrase: "recovery-passphrase"
//!
//! # Game Configuration (optional)
//! game:
//!   # Pairs of [civilian word, undercover word], one is drawn per game
//!   word_pairs:
//!     - ["Sun", "Moon"]
//!     - ["Coffee", "Tea"]
//! ```
//!
//! # Environment Variable Overrides
//!
//! Any value can be overridden with an `UNDERCOVER_` variable, sections being
//! separated by a double underscore: `UNDERCOVER_MATRIX__PASSWORD`.

use anyhow::{Context, bail};
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use log::debug;
use serde::Deserialize;

use crate::game::WordPair;

/// Prefix of the environment variables overriding the file.
const ENV_PREFIX: &str = "UNDERCOVER_";

/// Root configuration structure for the Undercover bot.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Matrix account configuration
    pub matrix: Matrix,
    /// Game configuration, defaults when the section is missing
    #[serde(default)]
    pub game: Game,
}

/// Matrix account configuration.
///
/// # YAML Section
///
/// ```yaml
/// matrix:
///   user_id: "@undercover:matrix.org"
///   password: "your-password"
///   passphrase: "your-recovery-passphrase"
/// ```
#[derive(Debug, Deserialize)]
pub struct Matrix {
    /// Fully qualified Matrix user ID.
    ///
    /// The Matrix ID of the bot account in the format `@username:homeserver.com`.
    pub user_id: String,

    /// Matrix account password.
    ///
    /// Used for initial login. After successful authentication, the session
    /// is persisted and the bot can restore without re-authenticating.
    pub password: String,

    /// E2EE recovery passphrase.
    ///
    /// Used to decrypt cross-signing keys and restore end-to-end encryption
    /// functionality. Required for participating in encrypted rooms.
    pub passphrase: String,
}

/// Game configuration.
#[derive(Debug, Deserialize)]
pub struct Game {
    /// Word pairs a new game draws from
    #[serde(default = "default_word_pairs")]
    pub word_pairs: Vec<WordPair>,
}

impl Default for Game {
    fn default() -> Self {
        Game {
            word_pairs: default_word_pairs(),
        }
    }
}

fn default_word_pairs() -> Vec<WordPair> {
    vec![WordPair::default()]
}

impl Config {
    /// Loads the configuration from a YAML file and the environment.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, a required value is missing, or a
    /// word pair is not playable (empty word, or both words equal).
    pub fn load(path: &str) -> anyhow::Result<Config> {
        let config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("invalid configuration in {}", path))?;

        config.validate()?;
        debug!(
            "configuration loaded for {} with {} word pairs",
            config.matrix.user_id,
            config.game.word_pairs.len()
        );

        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.game.word_pairs.is_empty() {
            bail!("game.word_pairs must contain at least one pair");
        }

        if let Some(pair) = self.game.word_pairs.iter().find(|pair| !pair.is_playable()) {
            bail!(
                "word pair [{:?}, {:?}] must hold two different, non-empty words",
                pair.civilian,
                pair.undercover
            );
        }

        Ok(())
    }
}
