//! Markdown response formatters for bot commands.
//!
//! Every user-visible message of the bot is produced here. Boards are emoji
//! grids separated by `\n`, which Markdown would fold into one paragraph, so
//! they are sent with hard line breaks.

use std::time::Duration;

use crate::{
    minesweeper::{BoardConfig, GameError},
    sessions::SessionSummary,
};

fn with_hard_breaks(text: &str) -> String {
    text.replace('\n', "  \n")
}

pub fn format_help(turn_timeout: Duration) -> String {
    let body = "Commands:\n\
        - `new-game [width] [height] [mines]`: start a new game, 8x8 with 10 mines by default (aliases `ng`, `n-g`)\n\
        - `click <x> <y>`: click the cell at column `x` and row `y`, then react to choose what to do (alias `c`)\n\
        - `quit`: give up your current game (aliases `quit-game`, `q`)\n\
        - `games`: list the active games (alias `list`)\n\
        - `spoilers-game [width] [height] [mines]`: get a whole board hidden behind spoilers (aliases `sg`, `s-g`)\n\
        - `help`: show this help message\n\n\
        After a click, react with ⛏️ to reveal the cell, 🚩 to flag it, ❓ to mark it, 🧼 to clear its mark or 🚫 to cancel. \
        A click without reaction for ";

    format!(
        "{}{} seconds ends the game.",
        body,
        turn_timeout.as_secs()
    )
}

pub fn format_unknown_command() -> String {
    "Unknown command. Type `!ms help` for more information.".to_owned()
}

pub fn format_invalid_new_game() -> String {
    "Invalid new-game command. Usage: `!ms new-game [width] [height] [mines]`".to_owned()
}

pub fn format_invalid_spoilers_game() -> String {
    "Invalid spoilers-game command. Usage: `!ms spoilers-game [width] [height] [mines]`".to_owned()
}

pub fn format_invalid_click() -> String {
    "Invalid click command. Usage: `!ms click <x> <y>`".to_owned()
}

pub fn format_new_game(config: &BoardConfig, board: &str) -> String {
    let adjustments: String = config
        .adjustments
        .iter()
        .map(|adjustment| format!("⚠️ Note: {}.  \n", adjustment))
        .collect();

    format!(
        "{}New game: {}x{} with {} mines. Use `!ms click <x> <y>` to play.  \n{}",
        adjustments,
        config.width,
        config.height,
        config.mines,
        with_hard_breaks(board)
    )
}

pub fn format_spoilers_game(config: &BoardConfig, board: &str) -> String {
    let adjustments: String = config
        .adjustments
        .iter()
        .map(|adjustment| format!("⚠️ Note: {}.  \n", adjustment))
        .collect();

    format!(
        "{}Spoilers game: {}x{} with {} mines, the top-left cell is already open.  \n{}",
        adjustments,
        config.width,
        config.height,
        config.mines,
        with_hard_breaks(board)
    )
}

pub fn format_turn_prompt(board: &str) -> String {
    format!(
        "React with ⛏️ to reveal, 🚩 to flag, ❓ to mark, 🧼 to clear or 🚫 to cancel.  \n{}",
        with_hard_breaks(board)
    )
}

pub fn format_board(board: &str) -> String {
    with_hard_breaks(board)
}

pub fn format_won(board: &str) -> String {
    format!("🎉 You won!  \n{}", with_hard_breaks(board))
}

pub fn format_lost(board: &str) -> String {
    format!("💥 Game over.  \n{}", with_hard_breaks(board))
}

pub fn format_quit(board: &str) -> String {
    format!(
        "✅ Successfully quit Minesweeper game.  \n{}",
        with_hard_breaks(board)
    )
}

pub fn format_timeout() -> String {
    "⚠️ Game timed out.".to_owned()
}

pub fn format_cancelled() -> String {
    "Click cancelled.".to_owned()
}

pub fn format_superseded() -> String {
    "⚠️ This click was for a game that has since ended, nothing was played.".to_owned()
}

pub fn format_game_error(error: GameError) -> String {
    match error {
        GameError::NoActiveSession => "⛔ You don't have a game, or your previous game went stale. \
            Run `!ms new-game` to start a new game."
            .to_owned(),
        GameError::OutOfBounds => "⛔ These coordinates are outside of your board.".to_owned(),
        GameError::AlreadyTerminal => {
            "⛔ This game is over. Run `!ms new-game` to start a new game.".to_owned()
        }
        GameError::AlreadyInitialized => {
            "⛔ Something went wrong with this board, please start a new game.".to_owned()
        }
    }
}

pub fn format_games(games: &[SessionSummary]) -> String {
    if games.is_empty() {
        return "No active games found.".to_owned();
    }

    let games_md = games
        .iter()
        .map(|game| {
            format!(
                "- **{}**: {}x{}, {} mines, {:?}, {} guesses, started {}s ago, idle for {}s",
                game.owner,
                game.width,
                game.height,
                game.mines,
                game.status,
                game.guess_count,
                game.age.as_secs(),
                game.idle.as_secs()
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!("Active games:\n\n{}", games_md)
}
