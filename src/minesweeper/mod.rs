//! Minesweeper game core.
//!
//! This module holds everything that does not depend on sessions or chat:
//!
//! - [`Board`]: the minefield, mine placement, flood-fill reveal
//! - [`GameEngine`]: the state machine enforcing a safe first click and
//!   classifying each move as continuing, won or lost
//! - [`BoardConfig`]: defaults, difficulty scaling and lenient clamping of the
//!   requested board size
//! - [`MineSampler`]: the source of randomness for mine placement
//! - [`render`]: emoji rendering of boards
//!
//! # Example
//!
//! ```no_run
//! use sweepbot::minesweeper::{BoardConfig, GameEngine, GameStatus, RandomSampler};
//!
//! let config = BoardConfig::new(None, None, None, 30);
//! let mut engine = GameEngine::new(&config, Box::new(RandomSampler::from_entropy()));
//!
//! // The first reveal can never hit a mine
//! assert_ne!(engine.reveal((0, 0)).unwrap(), GameStatus::Lost);
//! ```

mod board;
mod board_config;
mod engine;
mod error;
pub mod render;
mod sampler;

pub use crate::minesweeper::board::{Board, Cell, CellState, Mark, RevealOutcome};
pub use crate::minesweeper::board_config::BoardConfig;
pub use crate::minesweeper::engine::{GameEngine, GameStatus};
pub use crate::minesweeper::error::{GameError, Result};
#[cfg(test)]
pub use crate::minesweeper::sampler::MockMineSampler;
pub use crate::minesweeper::sampler::{MineSampler, RandomSampler};

/// Cell position as `(row, col)`, zero-based.
pub type Coord = (usize, usize);
