//! Shared registry of active games, keyed by owner.
//!
//! This module provides the [`SessionStore`], the only process-wide mutable
//! state of the bot. Every operation takes the registry lock once, so
//! operations coming from concurrent turns and from the periodic sweep are
//! linearizable.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use log::{debug, info};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Duration, Instant},
};

use crate::{
    minesweeper::{BoardConfig, GameEngine, GameError, RandomSampler, Result},
    sessions::{Session, SessionId, SessionSummary},
};

/// Registry mapping an owner to at most one [`Session`].
///
/// Cloning the store is cheap and every clone shares the same registry, the
/// same way the bot shares it between the message handlers and the sweep
/// task.
///
/// # Examples
///
/// ```no_run
/// use sweepbot::minesweeper::BoardConfig;
/// use sweepbot::sessions::SessionStore;
///
/// # async fn example() {
/// let store = SessionStore::new();
/// store
///     .create_or_replace("@alice:example.com", &BoardConfig::new(None, None, None, 30))
///     .await;
///
/// assert!(store.get("@alice:example.com").await.is_ok());
/// # }
/// ```
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    next_id: Arc<AtomicU64>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    /// Starts a new game for `owner`, discarding any previous one.
    ///
    /// Returns the id of the new session.
    pub async fn create_or_replace(&self, owner: &str, config: &BoardConfig) -> SessionId {
        let engine = GameEngine::new(config, Box::new(RandomSampler::from_entropy()));
        self.insert(owner, engine).await
    }

    pub(crate) async fn insert(&self, owner: &str, engine: GameEngine) -> SessionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let previous = self
            .sessions
            .lock()
            .await
            .insert(owner.to_owned(), Session::new(id, owner, engine));

        if previous.is_some() {
            info!("replaced the previous game of {}", owner);
        } else {
            info!("{} started a new game", owner);
        }

        id
    }

    /// Returns a snapshot of the session of `owner`.
    pub async fn get(&self, owner: &str) -> Result<SessionSummary> {
        self.with_session(owner, |session| session.summary()).await
    }

    /// Runs `f` on the session of `owner` while holding the registry lock.
    ///
    /// Does not count as activity, see [`SessionStore::touch`].
    pub async fn with_session<R>(&self, owner: &str, f: impl FnOnce(&mut Session) -> R) -> Result<R> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(owner).ok_or(GameError::NoActiveSession)?;

        Ok(f(session))
    }

    /// Like [`SessionStore::with_session`], but only on the session `id`.
    ///
    /// Fails with [`GameError::NoActiveSession`] once that session was
    /// removed or replaced by a new game.
    pub async fn with_session_if<R>(
        &self,
        owner: &str,
        id: SessionId,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(owner)
            .filter(|session| session.id == id)
            .ok_or(GameError::NoActiveSession)?;

        Ok(f(session))
    }

    /// Records activity on the session of `owner`.
    ///
    /// Must happen before a turn starts waiting for input, so that the sweep
    /// does not evict a session whose turn is pending.
    pub async fn touch(&self, owner: &str) -> Result<()> {
        self.with_session(owner, |session| session.touch()).await
    }

    /// Removes the session `id` of `owner`, leaving a newer game in place.
    pub async fn remove_if(&self, owner: &str, id: SessionId) -> bool {
        let mut sessions = self.sessions.lock().await;
        if sessions.get(owner).is_none_or(|session| session.id != id) {
            return false;
        }

        sessions.remove(owner);
        debug!("removed the game of {}", owner);
        true
    }

    /// Removes the session of `owner` and hands it to `f`, in one step.
    pub async fn remove_with<R>(&self, owner: &str, f: impl FnOnce(Session) -> R) -> Result<R> {
        let session = self
            .sessions
            .lock()
            .await
            .remove(owner)
            .ok_or(GameError::NoActiveSession)?;
        debug!("removed the game of {}", owner);

        Ok(f(session))
    }

    /// Removes every session idle for strictly more than `threshold`.
    ///
    /// Returns the owners of the removed sessions.
    pub async fn sweep_stale(&self, threshold: Duration) -> Vec<String> {
        let now = Instant::now();
        let mut stale_owners = Vec::new();

        self.sessions.lock().await.retain(|owner, session| {
            if session.idle_for(now) > threshold {
                stale_owners.push(owner.clone());
                false
            } else {
                true
            }
        });

        stale_owners.sort();
        stale_owners
    }

    /// Snapshots of every active session, ordered by owner.
    pub async fn list_active(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .lock()
            .await
            .values()
            .map(Session::summary)
            .collect();

        summaries.sort_by(|a, b| a.owner.cmp(&b.owner));
        summaries
    }

    /// Drops every session.
    pub async fn clear(&self) {
        let mut sessions = self.sessions.lock().await;
        info!("clearing {} minesweeper games", sessions.len());
        sessions.clear();
    }

    /// Starts a background task sweeping stale sessions every `interval`.
    ///
    /// The task runs until the returned handle is aborted or the program
    /// exits. It never waits on a turn: it only takes the registry lock for
    /// the duration of one sweep.
    pub fn start_sweep_task(&self, interval: Duration, threshold: Duration) -> JoinHandle<()> {
        let store = self.clone();

        tokio::spawn(async move {
            info!(
                "sweeping games idle for more than {} seconds every {} seconds",
                threshold.as_secs(),
                interval.as_secs()
            );
            let mut interval = time::interval(interval);
            loop {
                interval.tick().await;
                let stale_owners = store.sweep_stale(threshold).await;
                debug!("stale games of {:?} removed", stale_owners);
                info!("{} stale minesweeper games removed", stale_owners.len());
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minesweeper::{Board, GameStatus, MockMineSampler};

    const THRESHOLD: Duration = Duration::from_secs(120);

    fn default_config() -> BoardConfig {
        BoardConfig::new(None, None, None, 30)
    }

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = SessionStore::new();

        assert!(store.list_active().await.is_empty());
        assert_eq!(
            store.get("@alice:example.com").await,
            Err(GameError::NoActiveSession)
        );
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::new();
        store
            .create_or_replace("@alice:example.com", &default_config())
            .await;

        let summary = store.get("@alice:example.com").await.unwrap();
        assert_eq!(summary.owner, "@alice:example.com");
        assert_eq!((summary.width, summary.height, summary.mines), (8, 8, 10));
        assert_eq!(summary.status, GameStatus::NotStarted);
    }

    #[tokio::test]
    async fn test_create_replaces_previous_game() {
        let store = SessionStore::new();
        let owner = "@alice:example.com";
        store.create_or_replace(owner, &default_config()).await;
        store
            .with_session(owner, |session| session.engine.reveal((0, 0)))
            .await
            .unwrap()
            .unwrap();

        let config = BoardConfig::new(Some(5), Some(4), Some(2), 30);
        store.create_or_replace(owner, &config).await;

        let summaries = store.list_active().await;
        assert_eq!(summaries.len(), 1);
        assert_eq!((summaries[0].width, summaries[0].height), (5, 4));
        assert_eq!(summaries[0].status, GameStatus::NotStarted);
    }

    #[tokio::test]
    async fn test_owners_are_independent() {
        let store = SessionStore::new();
        store.create_or_replace("@alice:example.com", &default_config()).await;
        store.create_or_replace("@bob:example.com", &default_config()).await;

        assert!(store.remove_with("@alice:example.com", drop).await.is_ok());

        let owners: Vec<String> = store
            .list_active()
            .await
            .into_iter()
            .map(|summary| summary.owner)
            .collect();
        assert_eq!(owners, vec!["@bob:example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = SessionStore::new();
        store.create_or_replace("@alice:example.com", &default_config()).await;

        assert!(store.remove_with("@alice:example.com", drop).await.is_ok());
        assert_eq!(
            store.remove_with("@alice:example.com", drop).await,
            Err(GameError::NoActiveSession)
        );
        assert_eq!(
            store.remove_with("@nobody:example.com", drop).await,
            Err(GameError::NoActiveSession)
        );
    }

    #[tokio::test]
    async fn test_replacing_game_gives_new_id() {
        let store = SessionStore::new();
        let owner = "@alice:example.com";
        let first = store.create_or_replace(owner, &default_config()).await;
        let second = store.create_or_replace(owner, &default_config()).await;

        assert_ne!(first, second);
        assert_eq!(
            store.with_session_if(owner, first, |session| session.id).await,
            Err(GameError::NoActiveSession)
        );
        assert_eq!(
            store.with_session_if(owner, second, |session| session.id).await,
            Ok(second)
        );
    }

    #[tokio::test]
    async fn test_remove_if_keeps_newer_game() {
        let store = SessionStore::new();
        let owner = "@alice:example.com";
        let first = store.create_or_replace(owner, &default_config()).await;
        let second = store.create_or_replace(owner, &default_config()).await;

        assert!(!store.remove_if(owner, first).await);
        assert!(store.get(owner).await.is_ok());

        assert!(store.remove_if(owner, second).await);
        assert!(!store.remove_if(owner, second).await);
        assert_eq!(store.get(owner).await, Err(GameError::NoActiveSession));
    }

    #[tokio::test]
    async fn test_remove_with_hands_over_session() {
        let store = SessionStore::new();
        let owner = "@alice:example.com";
        let id = store.create_or_replace(owner, &default_config()).await;

        assert_eq!(store.remove_with(owner, |session| session.id).await, Ok(id));
        assert_eq!(
            store.remove_with(owner, |session| session.id).await,
            Err(GameError::NoActiveSession)
        );
    }

    #[tokio::test]
    async fn test_touch_missing_session() {
        let store = SessionStore::new();
        assert_eq!(
            store.touch("@alice:example.com").await,
            Err(GameError::NoActiveSession)
        );
    }

    #[tokio::test]
    async fn test_with_session_mutates_engine() {
        let store = SessionStore::new();
        let board = Board::from_mine_coords(2, 1, &[(0, 0)]);
        store
            .insert(
                "@alice:example.com",
                GameEngine::from_board(board, Box::new(MockMineSampler::new())),
            )
            .await;

        let status = store
            .with_session("@alice:example.com", |session| session.engine.reveal((0, 1)))
            .await
            .unwrap();

        assert_eq!(status, Ok(GameStatus::Won));
        assert_eq!(
            store.get("@alice:example.com").await.unwrap().status,
            GameStatus::Won
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_touched_session_survives_sweep() {
        let store = SessionStore::new();
        store.create_or_replace("@alice:example.com", &default_config()).await;

        time::advance(Duration::from_secs(30)).await;
        store.touch("@alice:example.com").await.unwrap();
        time::advance(Duration::from_secs(60)).await;

        assert!(store.sweep_stale(THRESHOLD).await.is_empty());
        assert!(store.get("@alice:example.com").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_is_swept() {
        let store = SessionStore::new();
        store.create_or_replace("@alice:example.com", &default_config()).await;
        store.touch("@alice:example.com").await.unwrap();

        time::advance(Duration::from_secs(121)).await;

        assert_eq!(
            store.sweep_stale(THRESHOLD).await,
            vec!["@alice:example.com".to_string()]
        );
        assert_eq!(
            store.get("@alice:example.com").await,
            Err(GameError::NoActiveSession)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_idle_exactly_threshold_is_kept() {
        let store = SessionStore::new();
        store.create_or_replace("@alice:example.com", &default_config()).await;

        time::advance(THRESHOLD).await;

        assert!(store.sweep_stale(THRESHOLD).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_only_removes_stale_sessions() {
        let store = SessionStore::new();
        store.create_or_replace("@alice:example.com", &default_config()).await;
        time::advance(Duration::from_secs(100)).await;
        store.create_or_replace("@bob:example.com", &default_config()).await;
        time::advance(Duration::from_secs(30)).await;

        let removed = store.sweep_stale(THRESHOLD).await;

        assert_eq!(removed, vec!["@alice:example.com".to_string()]);
        assert!(store.get("@bob:example.com").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_task_evicts_idle_sessions() {
        let store = SessionStore::new();
        store.create_or_replace("@alice:example.com", &default_config()).await;

        let handle = store.start_sweep_task(Duration::from_secs(60), THRESHOLD);

        time::sleep(Duration::from_secs(90)).await;
        assert!(store.get("@alice:example.com").await.is_ok());

        time::sleep(Duration::from_secs(110)).await;
        assert_eq!(
            store.get("@alice:example.com").await,
            Err(GameError::NoActiveSession)
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let store = SessionStore::new();
        store.create_or_replace("@alice:example.com", &default_config()).await;
        store.create_or_replace("@bob:example.com", &default_config()).await;

        store.clear().await;

        assert!(store.list_active().await.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_registry() {
        let store = SessionStore::new();
        let clone = store.clone();

        clone.create_or_replace("@alice:example.com", &default_config()).await;

        assert!(store.get("@alice:example.com").await.is_ok());
    }
}
