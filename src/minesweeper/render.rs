//! Text rendering of boards with emoji glyphs.
//!
//! Rows are separated by `\n`. The first line holds the column numerals and
//! every row starts with its own numeral, so players can read the 1-based
//! coordinates to pass to `click`.

use std::borrow::Cow;

use crate::minesweeper::{Board, Cell, CellState, GameEngine, GameStatus};

pub const COVERED: &str = "⬜";
pub const FLAGGED: &str = "🚩";
pub const MARKED: &str = "❓";
pub const MINE: &str = "💣";
/// Top-left corner of the coordinate headers, also used for zero
pub const BLANK: &str = "🟦";

const NUMBERS: [&str; 21] = [
    BLANK, "1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟", "⑪", "⑫", "⑬", "⑭",
    "⑮", "⑯", "⑰", "⑱", "⑲", "⑳",
];

/// Glyph for a number: enumerated up to 20, plain decimal above.
pub fn number_glyph(number: usize) -> Cow<'static, str> {
    match NUMBERS.get(number) {
        Some(&glyph) => Cow::Borrowed(glyph),
        None => Cow::Owned(format!("{} ", number)),
    }
}

fn cell_glyph(cell: &Cell, reveal_mines: bool) -> Cow<'static, str> {
    match cell.state {
        CellState::Revealed if cell.is_mine => Cow::Borrowed(MINE),
        CellState::Revealed => number_glyph(cell.adjacent_mines as usize),
        _ if reveal_mines && cell.is_mine => Cow::Borrowed(MINE),
        CellState::Covered => Cow::Borrowed(COVERED),
        CellState::Flagged => Cow::Borrowed(FLAGGED),
        CellState::Marked => Cow::Borrowed(MARKED),
    }
}

/// Renders the board with coordinate headers.
///
/// With `reveal_mines`, covered mines are drawn as mines whatever their mark
/// while safe covered cells keep their mark glyph.
pub fn render_board(board: &Board, reveal_mines: bool) -> String {
    let header: String = std::iter::once(Cow::Borrowed(BLANK))
        .chain((1..=board.width()).map(number_glyph))
        .collect();

    let rows = board.rows().enumerate().map(|(index, row)| {
        std::iter::once(number_glyph(index + 1))
            .chain(row.iter().map(|cell| cell_glyph(cell, reveal_mines)))
            .collect::<String>()
    });

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<String>>()
        .join("\n")
}

/// Renders a game, uncovering the mines when it is lost.
pub fn render_game(engine: &GameEngine) -> String {
    render_board(engine.board(), engine.status() == GameStatus::Lost)
}

/// Renders every cell with its true content, covered cells hidden behind a
/// Matrix spoiler. Revealed cells are shown as is.
pub fn render_spoilers(board: &Board) -> String {
    board
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    let glyph = if cell.is_mine {
                        Cow::Borrowed(MINE)
                    } else {
                        number_glyph(cell.adjacent_mines as usize)
                    };
                    if cell.state == CellState::Revealed {
                        glyph.into_owned()
                    } else {
                        format!("<span data-mx-spoiler>{}</span>", glyph)
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<String>>()
        .join("\n")
}
