//! One-shot turn protocol between a click and the game engine.
//!
//! A turn renders the board, waits for exactly one disambiguating [`Symbol`]
//! from the player, then applies it to the clicked cell. The chat side is
//! reached through two collaborators:
//!
//! - [`RenderSink`]: sends text back to where the click came from
//! - [`EventWaiter`]: waits for one qualifying reaction with a timeout

mod controller;

use std::time::Duration;

use mockall::automock;
use thiserror::Error;

pub use crate::turns::controller::TurnController;

/// Input disambiguating what a click does.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Reveal,
    Flag,
    Mark,
    Clear,
    Cancel,
}

impl Symbol {
    /// Every symbol, in the order the prompt reactions are offered.
    pub const ALL: [Symbol; 5] = [
        Symbol::Reveal,
        Symbol::Flag,
        Symbol::Mark,
        Symbol::Clear,
        Symbol::Cancel,
    ];

    /// Reaction key of the symbol.
    pub const fn key(self) -> &'static str {
        match self {
            Symbol::Reveal => "⛏️",
            Symbol::Flag => "🚩",
            Symbol::Mark => "❓",
            Symbol::Clear => "🧼",
            Symbol::Cancel => "🚫",
        }
    }

    /// Parses a reaction key, with or without the emoji variation selector.
    pub fn from_key(key: &str) -> Option<Symbol> {
        let key = key.trim_end_matches('\u{fe0f}');
        Symbol::ALL
            .into_iter()
            .find(|symbol| symbol.key().trim_end_matches('\u{fe0f}') == key)
    }
}

/// Chat message that started a turn.
///
/// Doubles as the correlation key of the awaited input: only reactions from
/// `sender_id` on `event_id` qualify.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub room_id: String,
    pub sender_id: String,
    pub event_id: String,
}

/// Error of a bounded wait.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaitError {
    #[error("no qualifying input before the timeout")]
    Timeout,
}

/// Sends rendered text to a destination.
#[automock]
pub trait RenderSink: Send + Sync {
    async fn send(&self, destination: &MessageRef, text: &str);
}

/// Waits for one qualifying input correlated to a message.
#[automock]
pub trait EventWaiter: Send + Sync {
    /// Resolves with the first symbol of `allowed` received from the sender of
    /// `origin` on `origin`, or [`WaitError::Timeout`] once `timeout` elapsed.
    async fn wait_one(
        &self,
        origin: &MessageRef,
        allowed: &[Symbol],
        timeout: Duration,
    ) -> Result<Symbol, WaitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_keys_round_trip() {
        for symbol in Symbol::ALL {
            assert_eq!(Symbol::from_key(symbol.key()), Some(symbol));
        }
    }

    #[test]
    fn test_symbol_from_key_without_variation_selector() {
        assert_eq!(Symbol::from_key("\u{26cf}"), Some(Symbol::Reveal));
        assert_eq!(Symbol::from_key("\u{26cf}\u{fe0f}"), Some(Symbol::Reveal));
    }

    #[test]
    fn test_symbol_from_unknown_key() {
        assert_eq!(Symbol::from_key("👍"), None);
        assert_eq!(Symbol::from_key(""), None);
    }
}
