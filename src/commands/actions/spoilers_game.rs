//! Spoilers game command handler.
//!
//! Generates a complete board in one message: the top-left cell is opened
//! like a first click and every other cell hides behind a Matrix spoiler, so
//! the game is played by clicking spoilers in the chat client. Nothing is
//! stored.

use log::debug;

use crate::{
    commands::{
        CommandContext, CommandResult,
        markdown_response::{format_game_error, format_spoilers_game},
    },
    minesweeper::{Board, BoardConfig, MineSampler, RandomSampler, render::render_spoilers},
};

pub fn handle_spoilers_game(
    context: &CommandContext,
    width: Option<i64>,
    height: Option<i64>,
    mines: Option<i64>,
) -> CommandResult {
    debug!("handling spoilers game command");

    let config = BoardConfig::new(width, height, mines, context.max_side);
    let response = match open_board(&config, &mut RandomSampler::from_entropy()) {
        Ok(board) => format_spoilers_game(&config, &render_spoilers(&board)),
        Err(error) => format_game_error(error),
    };

    CommandResult { response }
}

fn open_board(
    config: &BoardConfig,
    sampler: &mut dyn MineSampler,
) -> crate::minesweeper::Result<Board> {
    let mut board = Board::new(config.width, config.height, config.mines);
    board.place_mines((0, 0), sampler)?;
    board.reveal((0, 0))?;

    Ok(board)
}
