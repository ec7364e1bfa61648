//! Minefield grid and its algorithms.
//!
//! The [`Board`] is a flat row-major vector of [`Cell`]s addressed by
//! `(row, col)` coordinates. It knows nothing about sessions or chat: it
//! places mines, counts adjacency, reveals cells (with the zero-count flood
//! fill) and tells whether every safe cell has been uncovered.
//!
//! Mines are placed lazily through [`Board::place_mines`] so that the cell of
//! the first reveal can be excluded.

use log::{error, warn};

use crate::minesweeper::{Coord, GameError, MineSampler, Result};

/// Visible state of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Covered,
    Flagged,
    Marked,
    Revealed,
}

/// Player annotation that can be put on a covered cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Remove any annotation
    Clear,
    /// The player thinks there is a mine
    Flag,
    /// The player is unsure
    Question,
}

impl From<Mark> for CellState {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Clear => CellState::Covered,
            Mark::Flag => CellState::Flagged,
            Mark::Question => CellState::Marked,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub is_mine: bool,
    /// Number of mines among the 8 neighbors, meaningful once mines are placed
    pub adjacent_mines: u8,
    pub state: CellState,
}

/// Result of [`Board::reveal`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Cell was already revealed, flagged or marked
    NoChange,
    /// At least one safe cell was revealed
    Revealed,
    HitMine,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    mine_count: usize,
    cells: Vec<Cell>,
    mines_placed: bool,
}

impl Board {
    /// Creates a covered board without mines.
    ///
    /// Zero dimensions are raised to 1 and the mine count is lowered to
    /// `width * height - 1` so that at least one safe cell always exists.
    pub fn new(width: usize, height: usize, mine_count: usize) -> Self {
        if width == 0 || height == 0 {
            warn!("invalid board dimensions {}x{}, clamping to 1", width, height);
        }
        let width = width.max(1);
        let height = height.max(1);

        let area = width * height;
        let mine_count = if mine_count >= area {
            warn!(
                "too many mines ({}) for a {}x{} board, clamping to {}",
                mine_count,
                width,
                height,
                area - 1
            );
            area - 1
        } else {
            mine_count
        };

        Board {
            width,
            height,
            mine_count,
            cells: vec![Cell::default(); area],
            mines_placed: false,
        }
    }

    /// Builds a board with mines at the given coordinates, already placed.
    #[cfg(test)]
    pub fn from_mine_coords(width: usize, height: usize, mines: &[Coord]) -> Self {
        let mut board = Board::new(width, height, 0);
        board.mine_count = mines.len();
        board.lay_mines(mines);
        board
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn contains(&self, (row, col): Coord) -> bool {
        row < self.height && col < self.width
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.contains(coord).then(|| &self.cells[self.index(coord)])
    }

    /// Iterates over the rows of the board, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Places the mines, never on `exclude`.
    ///
    /// # Errors
    ///
    /// [`GameError::AlreadyInitialized`] if mines were already placed,
    /// [`GameError::OutOfBounds`] if `exclude` is not on the board.
    pub fn place_mines(&mut self, exclude: Coord, sampler: &mut dyn MineSampler) -> Result<()> {
        if self.mines_placed {
            error!("attempted to place mines twice on the same board");
            return Err(GameError::AlreadyInitialized);
        }
        if !self.contains(exclude) {
            return Err(GameError::OutOfBounds);
        }

        let mines = sampler.sample_distinct(self.width, self.height, self.mine_count, exclude);
        self.lay_mines(&mines);

        Ok(())
    }

    fn lay_mines(&mut self, mines: &[Coord]) {
        for &coord in mines {
            let index = self.index(coord);
            if self.cells[index].is_mine {
                continue;
            }
            self.cells[index].is_mine = true;
            self.cells[index].adjacent_mines = 0;

            for neighbor in neighbors(coord, self.width, self.height) {
                let neighbor_index = self.index(neighbor);
                if !self.cells[neighbor_index].is_mine {
                    self.cells[neighbor_index].adjacent_mines += 1;
                }
            }
        }
        self.mines_placed = true;
    }

    /// Reveals a cell, flooding through zero-count neighbors.
    ///
    /// Already revealed, flagged and marked cells are left untouched. The
    /// flood fill only ever enqueues covered cells and reveals them as it
    /// enqueues, so each cell is visited at most once.
    pub fn reveal(&mut self, coord: Coord) -> Result<RevealOutcome> {
        if !self.contains(coord) {
            return Err(GameError::OutOfBounds);
        }

        let index = self.index(coord);
        if self.cells[index].state != CellState::Covered {
            return Ok(RevealOutcome::NoChange);
        }

        self.cells[index].state = CellState::Revealed;
        if self.cells[index].is_mine {
            return Ok(RevealOutcome::HitMine);
        }

        let mut to_visit = Vec::new();
        if self.cells[index].adjacent_mines == 0 {
            to_visit.push(coord);
        }

        while let Some(current) = to_visit.pop() {
            for neighbor in neighbors(current, self.width, self.height) {
                let neighbor_index = self.index(neighbor);
                let cell = &mut self.cells[neighbor_index];
                if cell.state != CellState::Covered || cell.is_mine {
                    continue;
                }
                cell.state = CellState::Revealed;
                if cell.adjacent_mines == 0 {
                    to_visit.push(neighbor);
                }
            }
        }

        Ok(RevealOutcome::Revealed)
    }

    /// Puts or removes a mark on a cell that is not revealed yet.
    ///
    /// Returns whether the cell changed.
    pub fn set_mark(&mut self, coord: Coord, mark: Mark) -> Result<bool> {
        if !self.contains(coord) {
            return Err(GameError::OutOfBounds);
        }

        let index = self.index(coord);
        let cell = &mut self.cells[index];
        let state = CellState::from(mark);
        if cell.state == CellState::Revealed || cell.state == state {
            return Ok(false);
        }
        cell.state = state;

        Ok(true)
    }

    /// True when every safe cell is revealed.
    pub fn is_cleared(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.is_mine || cell.state == CellState::Revealed)
    }

    /// Reveals every cell regardless of marks, for a give-up rendering.
    pub fn reveal_all(&mut self) {
        for cell in &mut self.cells {
            cell.state = CellState::Revealed;
        }
    }

    fn index(&self, (row, col): Coord) -> usize {
        row * self.width + col
    }
}

/// In-bounds 8-neighbors of `coord` on a `width` x `height` grid.
pub fn neighbors((row, col): Coord, width: usize, height: usize) -> impl Iterator<Item = Coord> {
    const OFFSETS: [(isize, isize); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    OFFSETS.into_iter().filter_map(move |(d_row, d_col)| {
        let row = row.checked_add_signed(d_row)?;
        let col = col.checked_add_signed(d_col)?;
        (row < height && col < width).then_some((row, col))
    })
}
