use thiserror::Error;

/// Errors returned by the game core.
///
/// None of these should take the bot down: they are turned into user-facing
/// replies by [`crate::commands`]. [`GameError::AlreadyInitialized`] is the
/// only one that points to a defect in the engine itself.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No active game for this user")]
    NoActiveSession,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyTerminal,
    #[error("Coordinates are outside of the board")]
    OutOfBounds,
    #[error("Mines have already been placed on this board")]
    AlreadyInitialized,
}

pub type Result<T> = core::result::Result<T, GameError>;
