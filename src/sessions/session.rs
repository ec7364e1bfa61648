use tokio::time::{Duration, Instant};

use crate::minesweeper::{GameEngine, GameStatus};

/// Identity of a session, distinct for every game started in a store.
///
/// A turn keeps the id of the session it started on, so it never acts on a
/// game that replaced it meanwhile.
pub type SessionId = u64;

/// One owner's game.
pub struct Session {
    pub id: SessionId,
    /// Opaque owner identifier, the Matrix user id of the player
    pub owner: String,
    pub engine: GameEngine,
    pub created_at: Instant,
    pub last_activity_at: Instant,
}

/// Read-only snapshot of a [`Session`], used for listings and lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub owner: String,
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    pub status: GameStatus,
    pub guess_count: u32,
    /// Time elapsed since the game started
    pub age: Duration,
    /// Time elapsed since the last turn-initiating action
    pub idle: Duration,
}

impl Session {
    pub fn new(id: SessionId, owner: &str, engine: GameEngine) -> Self {
        let now = Instant::now();
        Session {
            id,
            owner: owner.to_owned(),
            engine,
            created_at: now,
            last_activity_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_activity_at = Instant::now();
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity_at)
    }

    pub fn summary(&self) -> SessionSummary {
        let board = self.engine.board();
        let now = Instant::now();
        SessionSummary {
            owner: self.owner.clone(),
            width: board.width(),
            height: board.height(),
            mines: board.mine_count(),
            status: self.engine.status(),
            guess_count: self.engine.guess_count(),
            age: now.saturating_duration_since(self.created_at),
            idle: self.idle_for(now),
        }
    }
}
