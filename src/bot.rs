//! Main bot orchestration.
//!
//! The [`Bot`] wires the Matrix client to the game engine:
//!
//! - **Messages** are parsed as commands and executed against the room's game.
//!   Unknown commands and game errors are answered with a reply.
//! - **Reactions** on a reveal prompt are turned into reveal actions.
//!
//! Every event is handled in its own task so the sync loop is never blocked.

use std::{path::Path, sync::Arc};

use log::debug;

use crate::{
    Args,
    commands::{CommandContext, CommandParseError, Commander},
    config::Config,
    game::{ActionContext, GameError, GameMaster},
    matrix::{IncomingMessage, IncomingReaction, MatrixClient, UserCredentials},
};

/// Undercover bot connecting Matrix rooms to games.
pub struct Bot {
    /// Matrix client used to receive events and send messages
    matrix_client: Arc<MatrixClient>,
    /// Games of every room
    game_master: Arc<GameMaster<MatrixClient>>,
    /// Command parser and dispatcher
    commander: Arc<Commander>,
}

impl Bot {
    /// Connects to Matrix and prepares the game engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the Matrix client cannot be set up.
    pub async fn new(config: Config, args: Args) -> Result<Self, anyhow::Error> {
        let matrix_client = Arc::new(
            MatrixClient::new(
                &UserCredentials {
                    user_id: config.matrix.user_id,
                    password: config.matrix.password,
                    passphrase: config.matrix.passphrase,
                },
                &Path::new(&args.data).join("session"),
            )
            .await?,
        );

        let game_master = Arc::new(GameMaster::new(
            Arc::clone(&matrix_client),
            config.game.word_pairs,
        ));

        Ok(Bot {
            matrix_client,
            game_master,
            commander: Arc::new(Commander::new()),
        })
    }

    /// Runs the Matrix sync loop, handling events until the process stops.
    pub async fn start(self) {
        let on_message = {
            let matrix_client = Arc::clone(&self.matrix_client);
            let game_master = Arc::clone(&self.game_master);
            let commander = Arc::clone(&self.commander);
            move |message: IncomingMessage| {
                Self::handle_message(
                    message,
                    Arc::clone(&matrix_client),
                    Arc::clone(&game_master),
                    Arc::clone(&commander),
                )
            }
        };

        let on_reaction = {
            let matrix_client = Arc::clone(&self.matrix_client);
            let game_master = Arc::clone(&self.game_master);
            move |reaction: IncomingReaction| {
                Self::handle_reaction(
                    reaction,
                    Arc::clone(&matrix_client),
                    Arc::clone(&game_master),
                )
            }
        };

        self.matrix_client.sync(on_message, on_reaction).await;
    }

    fn handle_message(
        message: IncomingMessage,
        matrix_client: Arc<MatrixClient>,
        game_master: Arc<GameMaster<MatrixClient>>,
        commander: Arc<Commander>,
    ) {
        tokio::spawn(async move {
            // Parse body to extract command
            let command = match commander.parse(&message.body) {
                Ok(command) => command,
                // Return silently if the command is not for the bot
                Err(CommandParseError::NotForBot) => return,
                // Send error message if the command is invalid
                Err(CommandParseError::InvalidCommand(reply)) => {
                    matrix_client
                        .send_reply(
                            &message.room_id,
                            &message.sender_id,
                            &message.event_id,
                            &reply,
                        )
                        .await;
                    return;
                }
            };

            let context = CommandContext {
                room_id: message.room_id.clone(),
                user_id: message.sender_id.clone(),
            };
            let result = commander
                .parse_command(&command, &context, &game_master)
                .await;

            if let Some(response) = result.response {
                matrix_client
                    .send_reply(
                        &message.room_id,
                        &message.sender_id,
                        &message.event_id,
                        &response,
                    )
                    .await;
            }
        });
    }

    fn handle_reaction(
        reaction: IncomingReaction,
        matrix_client: Arc<MatrixClient>,
        game_master: Arc<GameMaster<MatrixClient>>,
    ) {
        tokio::spawn(async move {
            let Some(token) = matrix_client
                .resolve_action(&reaction)
                .await
            else {
                return;
            };

            let context = ActionContext {
                room_id: reaction.room_id,
                user_id: reaction.sender_id,
            };
            match game_master.handle_reveal_action(&context, &token).await {
                Ok(()) => {}
                Err(GameError::StaleOrInvalidAction) => {
                    debug!("ignoring stale action {} from {}", token, context.user_id);
                }
                Err(e) => debug!("reveal action {} failed: {}", token, e),
            }
        });
    }
}
