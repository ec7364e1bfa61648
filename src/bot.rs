//! Bot wiring the Matrix client to the Minesweeper sessions.
//!
//! # Overview
//!
//! Every Matrix user can own one Minesweeper game. Commands are sent as
//! messages, a click is then completed by reacting to the click message.
//!
//! # Architecture
//!
//! The bot runs two concurrent tasks:
//!
//! 1. **Sweep Task**: periodically discards the games idle for too long.
//! 2. **Matrix Sync Task**: receives the messages and reactions. Each message
//!    is handled in its own task, so a turn waiting for a reaction never blocks
//!    the other players.
//!
//! # Message Flow
//!
//! ```text
//! Matrix Message → Parse Command ─┬─ click ──→ TurnController ⇄ reactions
//!                                 └─ others ─→ Commander → Reply
//! ```
//!
//! # Example
//!
//! ```no_run
//! # use sweepbot::bot::Bot;
//! # use sweepbot::config::Config;
//! # use sweepbot::Args;
//! # async fn run(args: Args) -> Result<(), anyhow::Error> {
//! let config = Config::load("config.yaml")?;
//!
//! let bot = Bot::new(config, args).await?;
//! bot.start().await; // Runs until the sync loop ends
//! # Ok(())
//! # }
//! ```

use std::{path::Path, sync::Arc, time::Duration};

use log::{debug, error, info};

use crate::{
    Args,
    commands::{
        Command, CommandContext, CommandParseError, Commander, markdown_response::format_game_error,
    },
    config::{Config, Minesweeper},
    matrix::{MatrixClient, ReactionRouter, ReactionWaiter, UserCredentials},
    sessions::SessionStore,
    turns::{MessageRef, TurnController},
};

type MatrixTurnController = TurnController<MatrixClient, ReactionWaiter<MatrixClient>>;

struct MessageContext {
    body: String,
    origin: MessageRef,
    matrix_client: Arc<MatrixClient>,
    commander: Arc<Commander>,
    turn_controller: Arc<MatrixTurnController>,
    store: SessionStore,
    max_side: usize,
    turn_timeout: Duration,
}

pub struct Bot {
    matrix_client: Arc<MatrixClient>,

    commander: Arc<Commander>,

    store: SessionStore,

    reaction_router: ReactionRouter,

    turn_controller: Arc<MatrixTurnController>,

    settings: Minesweeper,
}

impl Bot {
    /// Logs into Matrix and prepares the game services.
    pub async fn new(config: Config, args: Args) -> Result<Self, anyhow::Error> {
        let matrix_client = Arc::new(
            MatrixClient::new(
                &UserCredentials {
                    user_id: config.matrix.user_id,
                    password: config.matrix.password,
                },
                Path::new(&args.data),
            )
            .await?,
        );

        let store = SessionStore::new();
        let reaction_router = ReactionRouter::new();
        let reaction_waiter = ReactionWaiter::new(Arc::clone(&matrix_client), reaction_router.clone());
        let turn_controller = Arc::new(TurnController::new(
            store.clone(),
            Arc::clone(&matrix_client),
            Arc::new(reaction_waiter),
            config.minesweeper.turn_timeout(),
        ));

        Ok(Bot {
            matrix_client,
            commander: Arc::new(Commander::new()),
            store,
            reaction_router,
            turn_controller,
            settings: config.minesweeper,
        })
    }

    /// Starts the sweep task then syncs with Matrix until the sync loop ends.
    ///
    /// Every game is discarded once the sync loop is over.
    pub async fn start(self) {
        let sweep_task = self.store.start_sweep_task(
            self.settings.sweep_interval(),
            self.settings.stale_threshold(),
        );

        let on_message = {
            let matrix_client = Arc::clone(&self.matrix_client);
            let commander = Arc::clone(&self.commander);
            let turn_controller = Arc::clone(&self.turn_controller);
            let store = self.store.clone();
            let max_side = self.settings.max_side;
            let turn_timeout = self.settings.turn_timeout();

            move |body: String, room_id: String, sender_id: String, event_id: String| {
                Self::handle_matrix_message(MessageContext {
                    body,
                    origin: MessageRef {
                        room_id,
                        sender_id,
                        event_id,
                    },
                    matrix_client: Arc::clone(&matrix_client),
                    commander: Arc::clone(&commander),
                    turn_controller: Arc::clone(&turn_controller),
                    store: store.clone(),
                    max_side,
                    turn_timeout,
                })
            }
        };

        let on_reaction = {
            let reaction_router = self.reaction_router.clone();

            move |_room_id: String, sender_id: String, event_id: String, key: String| {
                let reaction_router = reaction_router.clone();
                tokio::spawn(async move {
                    reaction_router.dispatch(&event_id, &sender_id, &key).await;
                });
            }
        };

        if let Err(e) = self.matrix_client.sync(on_message, on_reaction).await {
            error!("matrix sync failed: {:?}", e);
        }

        info!("shutting down, discarding every game");
        sweep_task.abort();
        self.store.clear().await;
    }

    fn handle_matrix_message(ctx: MessageContext) {
        tokio::spawn(async move {
            let command = match ctx.commander.parse(&ctx.body) {
                Ok(command) => command,
                Err(e) => match e {
                    // Return silently if the command is not for the bot
                    CommandParseError::NotForBot => return,
                    CommandParseError::InvalidCommand(message) => {
                        ctx.reply(&message).await;
                        return;
                    }
                },
            };

            if let Command::Click { x, y } = command {
                match ctx.turn_controller.click(&ctx.origin, x, y).await {
                    Ok(outcome) => debug!("turn of {} ended: {:?}", ctx.origin.sender_id, outcome),
                    Err(error) => ctx.reply(&format_game_error(error)).await,
                }
                return;
            }

            let command_context = CommandContext {
                user_id: ctx.origin.sender_id.clone(),
                store: ctx.store.clone(),
                max_side: ctx.max_side,
                turn_timeout: ctx.turn_timeout,
            };

            if let Some(command_result) = ctx.commander.parse_command(&command, &command_context).await
            {
                ctx.reply(&command_result.response).await;
            }
        });
    }
}

impl MessageContext {
    async fn reply(&self, body: &str) {
        self.matrix_client
            .send_reply(
                &self.origin.room_id,
                &self.origin.sender_id,
                &self.origin.event_id,
                body,
            )
            .await;
    }
}
