//! New game command handler.
//!
//! Builds the board configuration from the user arguments, clamping what is
//! not allowed, and replaces any game of the user without confirmation.

use log::{debug, info};

use crate::{
    commands::{
        CommandContext, CommandResult,
        markdown_response::{format_game_error, format_new_game},
    },
    minesweeper::{BoardConfig, render::render_game},
};

pub async fn handle_new_game(
    context: &CommandContext,
    width: Option<i64>,
    height: Option<i64>,
    mines: Option<i64>,
) -> CommandResult {
    debug!(
        "handling new game command: width {:?}, height {:?}, mines {:?}",
        width, height, mines
    );

    let config = BoardConfig::new(width, height, mines, context.max_side);
    let id = context
        .store
        .create_or_replace(&context.user_id, &config)
        .await;
    info!(
        "{} started a {}x{} game with {} mines",
        context.user_id, config.width, config.height, config.mines
    );

    // The game can already be gone, or replaced, if another command ran in between
    let response = match context
        .store
        .with_session_if(&context.user_id, id, |session| render_game(&session.engine))
        .await
    {
        Ok(board) => format_new_game(&config, &board),
        Err(error) => format_game_error(error),
    };

    CommandResult { response }
}
