//! Game state machine around a [`Board`].

use log::debug;

use crate::minesweeper::{
    Board, BoardConfig, Coord, GameError, Mark, MineSampler, Result, RevealOutcome,
};

/// Lifecycle of a game.
///
/// Transitions only go forward: `NotStarted -> InProgress -> Won | Lost`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameStatus {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Wraps a [`Board`], places the mines on the first reveal and classifies
/// the outcome of every move.
pub struct GameEngine {
    board: Board,
    status: GameStatus,
    guess_count: u32,
    abandoned: bool,
    sampler: Box<dyn MineSampler>,
}

impl GameEngine {
    pub fn new(config: &BoardConfig, sampler: Box<dyn MineSampler>) -> Self {
        GameEngine {
            board: Board::new(config.width, config.height, config.mines),
            status: GameStatus::NotStarted,
            guess_count: 0,
            abandoned: false,
            sampler,
        }
    }

    /// Wraps a board whose mines may already be placed.
    #[cfg(test)]
    pub fn from_board(board: Board, sampler: Box<dyn MineSampler>) -> Self {
        let status = if board.mines_placed() {
            GameStatus::InProgress
        } else {
            GameStatus::NotStarted
        };
        GameEngine {
            board,
            status,
            guess_count: 0,
            abandoned: false,
            sampler,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn guess_count(&self) -> u32 {
        self.guess_count
    }

    /// True once the player gave up with [`GameEngine::quit`].
    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    /// Reveals a cell and returns the resulting status.
    ///
    /// The first reveal places the mines around the clicked cell, so it can
    /// never hit one.
    pub fn reveal(&mut self, coord: Coord) -> Result<GameStatus> {
        self.check_playable()?;
        if !self.board.contains(coord) {
            return Err(GameError::OutOfBounds);
        }

        if self.status == GameStatus::NotStarted {
            self.board.place_mines(coord, self.sampler.as_mut())?;
            self.status = GameStatus::InProgress;
            debug!(
                "placed {} mines on a {}x{} board",
                self.board.mine_count(),
                self.board.width(),
                self.board.height()
            );
        }

        self.guess_count += 1;
        match self.board.reveal(coord)? {
            RevealOutcome::HitMine => self.status = GameStatus::Lost,
            _ if self.board.is_cleared() => self.status = GameStatus::Won,
            _ => {}
        }

        Ok(self.status)
    }

    /// Flags, marks or clears a covered cell.
    pub fn set_mark(&mut self, coord: Coord, mark: Mark) -> Result<GameStatus> {
        self.check_playable()?;
        self.board.set_mark(coord, mark)?;

        Ok(self.status)
    }

    /// Gives up: every cell is uncovered for a last look at the board.
    ///
    /// The status is left as is, an abandoned game is neither won nor lost.
    pub fn quit(&mut self) {
        self.board.reveal_all();
        self.abandoned = true;
    }

    fn check_playable(&self) -> Result<()> {
        if self.status.is_finished() || self.abandoned {
            Err(GameError::AlreadyTerminal)
        } else {
            Ok(())
        }
    }
}
