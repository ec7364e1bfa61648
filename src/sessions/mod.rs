//! Per-owner game sessions and their lifecycle.
//!
//! - [`Session`]: one owner's game with its activity timestamps
//! - [`SessionStore`]: the shared registry with creation, lookup, touch,
//!   removal and the periodic sweep of stale sessions
//!
//! A session is created by `new-game` (replacing any previous one), touched
//! at the start of every turn and removed on quit, on a terminal outcome, on
//! a turn timeout, or by the sweep once idle beyond the threshold.

mod session;
mod session_store;

pub use crate::sessions::session::{Session, SessionId, SessionSummary};
pub use crate::sessions::session_store::SessionStore;
