//! Quit command handler.
//!
//! Uncovers the whole board for a last look, then drops the game.

use log::{debug, info};

use crate::{
    commands::{
        CommandContext, CommandResult,
        markdown_response::{format_game_error, format_quit},
    },
    minesweeper::render::render_game,
};

pub async fn handle_quit(context: &CommandContext) -> CommandResult {
    debug!("handling quit command");

    let board = context
        .store
        .remove_with(&context.user_id, |mut session| {
            session.engine.quit();
            render_game(&session.engine)
        })
        .await;

    let response = match board {
        Ok(board) => {
            info!("{} quit their game", context.user_id);
            format_quit(&board)
        }
        Err(error) => format_game_error(error),
    };

    CommandResult { response }
}
