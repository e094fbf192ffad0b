//! Undercover - A Matrix bot hosting Undercover / Mister White games.
//!
//! This is the main entry point for the bot, which lets a Matrix room play the
//! party word-guessing game without a game master.
//!
//! # Overview
//!
//! Players register by name in a room, the bot deals roles and secret words, then
//! prompts players one after the other to privately reveal their word. The round
//! itself (describing words, voting) is played out loud.
//!
//! - **Civilians** share a word
//! - **Undercover** gets a close but different word
//! - **Mister White** gets no word and must guess it
//!
//! # Features
//!
//! - **One game per room**: every room hosts its own independent game
//! - **Running player list**: a single message edited as players join
//! - **Private reveal**: tapping 👀 on your turn sends your word in a direct chat
//! - **Configurable words**: word pairs are drawn from the configuration
//! - **Session Persistence**: Maintains Matrix login sessions across restarts
//! - **YAML Configuration**: Simple configuration file format with environment variable support
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! matrix:
//!   user_id: "@undercover:matrix.org"
//!   password: "your-password"
//!   passphrase: "your-recovery-passphrase"
//!
//! game:
//!   word_pairs:
//!     - ["Sun", "Moon"]
//!     - ["Coffee", "Tea"]
//! ```
//!
//! # Environment Variable Overrides
//!
//! Override any configuration value using environment variables with the `UNDERCOVER_` prefix:
//!
//! ```bash
//! export UNDERCOVER_MATRIX__USER_ID="@undercover:matrix.org"
//! export UNDERCOVER_MATRIX__PASSWORD="your-password"
//! export UNDERCOVER_MATRIX__PASSPHRASE="your-passphrase"
//! ```
//!
//! # Usage
//!
//! ```bash
//! undercover --config config.yaml --data ./undercover-data
//! ```
//!
//! # Bot Commands
//!
//! - `!undercover help` - Display help information
//! - `!undercover startgame` - Start a new game in the room
//! - `!undercover addplayer <name>` - Register a player
//! - `!undercover done` - Deal the roles (3 players minimum)
//! - `!undercover reveal` - Prompt players to reveal their words
//! - `!undercover endgame` - End the game and disclose roles
//!
//! # Architecture
//!
//! - [`bot`] - Wires Matrix events to commands and reveal actions
//! - [`commands`] - Command parsing and execution
//! - [`config`] - YAML configuration with environment variable overrides
//! - [`game`] - Game rules, sessions and the engine sequencing notifications
//! - [`matrix`] - Matrix client integration and session management
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod game;
mod matrix;

/// Command-line arguments for the Undercover bot.
///
/// # Examples
///
/// ```bash
/// undercover --config config.yaml --data ./undercover-data
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// See the [`config`] module for the expected format.
    #[arg(short, long)]
    config: String,

    /// Path to the directory for storing persistent data.
    ///
    /// This directory will contain `session/`, with the Matrix login tokens and
    /// the encrypted SQLite store. Restrict its permissions: it allows
    /// impersonating the bot.
    #[arg(short, long)]
    data: String,
}

/// Main entry point for the Undercover bot.
///
/// 1. **Logging Setup**: `info` level by default, overridden by `RUST_LOG`
/// 2. **Argument Parsing**: Parses command-line arguments using `clap`
/// 3. **Configuration Loading**: Reads the YAML file and environment overrides
/// 4. **Bot Initialization**: Logs into Matrix and sets up encryption
/// 5. **Bot Execution**: Runs the Matrix sync loop
///
/// Configuration and initialization errors are logged and end the process.
#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting undercover {}...", env!("CARGO_PKG_VERSION"));

    // Parse command line arguments
    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {:#}", e);
            return;
        }
    };

    // Launch bot
    let bot = match Bot::new(config, args).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {:#}", e);
            return;
        }
    };
    bot.start().await;
}
