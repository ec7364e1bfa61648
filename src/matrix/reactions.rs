//! Reaction-based input for click turns.
//!
//! The [`ReactionWaiter`] offers the turn symbols as reactions on the click
//! message and waits for the click sender to pick one. Incoming reactions are
//! fed to the shared [`ReactionRouter`] by the sync loop.

use std::{collections::HashMap, sync::Arc, time::Duration};

use log::{debug, trace};
use mockall::automock;
use tokio::sync::{Mutex, oneshot};

use crate::turns::{EventWaiter, MessageRef, Symbol, WaitError};

/// Adds a reaction to a message.
#[automock]
pub trait Reactor: Send + Sync {
    async fn react(&self, room_id: &str, event_id: &str, key: &str);
}

/// Turn waiting for a symbol.
struct PendingTurn {
    allowed: Vec<Symbol>,
    reply: oneshot::Sender<Symbol>,
}

/// Routes incoming reactions to the turns waiting for them.
///
/// A turn is keyed by the reacted event and the expected reactor, any other
/// reaction is ignored.
#[derive(Clone, Default)]
pub struct ReactionRouter {
    pending: Arc<Mutex<HashMap<(String, String), PendingTurn>>>,
}

impl ReactionRouter {
    pub fn new() -> Self {
        ReactionRouter::default()
    }

    /// Starts waiting for a reaction of `sender_id` on `event_id`.
    ///
    /// Replaces a previous wait on the same key, its receiver then resolves
    /// with an error.
    async fn register(
        &self,
        event_id: &str,
        sender_id: &str,
        allowed: &[Symbol],
    ) -> oneshot::Receiver<Symbol> {
        let (reply, receiver) = oneshot::channel();
        let turn = PendingTurn {
            allowed: allowed.to_vec(),
            reply,
        };

        self.pending
            .lock()
            .await
            .insert((event_id.to_string(), sender_id.to_string()), turn);

        receiver
    }

    /// Drops the wait on `event_id` for `sender_id`, if any.
    async fn cancel(&self, event_id: &str, sender_id: &str) {
        self.pending
            .lock()
            .await
            .remove(&(event_id.to_string(), sender_id.to_string()));
    }

    /// Delivers a reaction to the turn waiting for it.
    ///
    /// Returns `true` if the reaction completed a turn. Reactions from other
    /// users, on other events or with keys the turn does not allow are
    /// dropped and the turn keeps waiting.
    pub async fn dispatch(&self, event_id: &str, sender_id: &str, key: &str) -> bool {
        let Some(symbol) = Symbol::from_key(key) else {
            trace!("ignore reaction {} from {}", key, sender_id);
            return false;
        };

        let mut pending = self.pending.lock().await;
        let turn_key = (event_id.to_string(), sender_id.to_string());

        match pending.get(&turn_key) {
            Some(turn) if turn.allowed.contains(&symbol) => {}
            _ => return false,
        }

        let Some(turn) = pending.remove(&turn_key) else {
            return false;
        };
        debug!("{} picked {:?} on {}", sender_id, symbol, event_id);

        turn.reply.send(symbol).is_ok()
    }
}

/// [`EventWaiter`] offering the symbols as reactions on the click message.
pub struct ReactionWaiter<R> {
    reactor: Arc<R>,
    router: ReactionRouter,
}

impl<R: Reactor> ReactionWaiter<R> {
    pub fn new(reactor: Arc<R>, router: ReactionRouter) -> Self {
        ReactionWaiter { reactor, router }
    }
}

impl<R: Reactor> EventWaiter for ReactionWaiter<R> {
    async fn wait_one(
        &self,
        origin: &MessageRef,
        allowed: &[Symbol],
        timeout: Duration,
    ) -> Result<Symbol, WaitError> {
        // Register before reacting so a fast player is not missed
        let receiver = self
            .router
            .register(&origin.event_id, &origin.sender_id, allowed)
            .await;

        for symbol in allowed {
            self.reactor
                .react(&origin.room_id, &origin.event_id, symbol.key())
                .await;
        }

        let result = tokio::time::timeout(timeout, receiver).await;
        self.router
            .cancel(&origin.event_id, &origin.sender_id)
            .await;

        match result {
            Ok(Ok(symbol)) => Ok(symbol),
            // A replaced wait counts as expired
            Ok(Err(_)) | Err(_) => Err(WaitError::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "!room:example.com";
    const EVENT: &str = "$click:example.com";
    const OWNER: &str = "@alice:example.com";

    fn origin() -> MessageRef {
        MessageRef {
            room_id: ROOM.to_string(),
            sender_id: OWNER.to_string(),
            event_id: EVENT.to_string(),
        }
    }

    fn reactor_offering(allowed: &[Symbol]) -> MockReactor {
        let mut reactor = MockReactor::new();
        for symbol in allowed {
            let key = symbol.key();
            reactor
                .expect_react()
                .withf(move |room_id, event_id, reaction| {
                    room_id == ROOM && event_id == EVENT && reaction == key
                })
                .times(1)
                .return_const(());
        }
        reactor
    }

    #[tokio::test]
    async fn test_dispatch_without_pending_turn() {
        let router = ReactionRouter::new();
        assert!(!router.dispatch(EVENT, OWNER, Symbol::Reveal.key()).await);
    }

    #[tokio::test]
    async fn test_dispatch_filters_sender_event_and_key() {
        let router = ReactionRouter::new();
        let mut receiver = router
            .register(EVENT, OWNER, &[Symbol::Reveal, Symbol::Cancel])
            .await;

        assert!(!router.dispatch(EVENT, "@bob:example.com", "⛏️").await);
        assert!(!router.dispatch("$other:example.com", OWNER, "⛏️").await);
        assert!(!router.dispatch(EVENT, OWNER, "👍").await);
        assert!(!router.dispatch(EVENT, OWNER, Symbol::Flag.key()).await);
        assert!(receiver.try_recv().is_err());

        assert!(router.dispatch(EVENT, OWNER, Symbol::Cancel.key()).await);
        assert_eq!(receiver.await, Ok(Symbol::Cancel));
    }

    #[tokio::test]
    async fn test_dispatch_completes_turn_once() {
        let router = ReactionRouter::new();
        let receiver = router.register(EVENT, OWNER, &Symbol::ALL).await;

        assert!(router.dispatch(EVENT, OWNER, "🚩").await);
        assert!(!router.dispatch(EVENT, OWNER, "⛏️").await);
        assert_eq!(receiver.await, Ok(Symbol::Flag));
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_turn() {
        let router = ReactionRouter::new();
        let receiver = router.register(EVENT, OWNER, &Symbol::ALL).await;

        router.cancel(EVENT, OWNER).await;

        assert!(!router.dispatch(EVENT, OWNER, "⛏️").await);
        assert!(receiver.await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_one_resolves_with_reaction() {
        let router = ReactionRouter::new();
        let waiter = ReactionWaiter::new(Arc::new(reactor_offering(&Symbol::ALL)), router.clone());

        let dispatcher = tokio::spawn({
            let router = router.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                router.dispatch(EVENT, OWNER, "⛏\u{fe0f}").await
            }
        });

        let result = waiter
            .wait_one(&origin(), &Symbol::ALL, Duration::from_secs(120))
            .await;

        assert_eq!(result, Ok(Symbol::Reveal));
        assert!(dispatcher.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_one_times_out() {
        let router = ReactionRouter::new();
        let allowed = [Symbol::Reveal, Symbol::Flag];
        let waiter = ReactionWaiter::new(Arc::new(reactor_offering(&allowed)), router.clone());

        let result = waiter
            .wait_one(&origin(), &allowed, Duration::from_secs(120))
            .await;

        assert_eq!(result, Err(WaitError::Timeout));
        // The late reaction is ignored
        assert!(!router.dispatch(EVENT, OWNER, "⛏️").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_one_ignores_other_players() {
        let router = ReactionRouter::new();
        let waiter = ReactionWaiter::new(Arc::new(reactor_offering(&Symbol::ALL)), router.clone());

        let dispatcher = tokio::spawn({
            let router = router.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                router.dispatch(EVENT, "@bob:example.com", "⛏️").await
            }
        });

        let result = waiter
            .wait_one(&origin(), &Symbol::ALL, Duration::from_secs(60))
            .await;

        assert_eq!(result, Err(WaitError::Timeout));
        assert!(!dispatcher.await.unwrap());
    }
}
