//! Bot command parsing and response formatting.
//!
//! This module provides the command pipeline of the bot, from a Matrix message
//! to a Markdown reply.
//!
//! # Architecture
//!
//! ```text
//! Matrix Message
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← Entry point: parse() + parse_command()
//! └─────────────┘
//!      │
//!      ├── parse() ───────────────────┐
//!      │                              ▼
//!      │                   ┌──────────────────┐
//!      │                   │  command::Command│
//!      │                   └──────────────────┘
//!      │
//!      └── parse_command() ──────────┐
//!                                    ▼
//!                         ┌─────────────────────┐
//!                         │ Action Handlers     │
//!                         │  - handle_help      │
//!                         │  - handle_new_game  │
//!                         │  - handle_quit      │
//!                         │  - handle_games     │
//!                         │  - handle_spoilers  │
//!                         └─────────────────────┘
//! ```
//!
//! `click` is the only command that is not answered here: it starts a turn
//! and is routed to the [`TurnController`](crate::turns::TurnController).
//!
//! # Command Structure
//!
//! | Command | Aliases | Arguments |
//! |---------|---------|-----------|
//! | `help` | | |
//! | `new-game` | `ng`, `n-g` | `[width] [height] [mines]` |
//! | `click` | `c` | `<x> <y>` |
//! | `quit` | `quit-game`, `q` | |
//! | `games` | `list` | |
//! | `spoilers-game` | `sg`, `s-g` | `[width] [height] [mines]` |
//!
//! # Error Handling
//!
//! - **Silent Errors** ([`CommandParseError::NotForBot`]): Messages that aren't commands
//!   or are for a different bot. These should not generate responses.
//!
//! - **User Errors** ([`CommandParseError::InvalidCommand`]): Invalid command syntax
//!   or arguments. These include the usage of the command.

mod actions;
pub mod command;
mod commander;
pub mod markdown_response;

pub use crate::commands::command::Command;
pub use crate::commands::commander::Commander;

use std::time::Duration;

use crate::sessions::SessionStore;

/// Runtime context for command execution.
#[derive(Clone)]
pub struct CommandContext {
    /// Matrix user ID of the command issuer, owner of the game
    pub user_id: String,
    /// Shared registry of active games
    pub store: SessionStore,
    /// Largest allowed board side
    pub max_side: usize,
    /// Time a player has to react after a click
    pub turn_timeout: Duration,
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Markdown-formatted response message
    pub response: String,
}

/// Errors that can occur during command parsing.
///
/// # Variants
///
/// * `NotForBot` - Message is not a command or is for a different bot.
///   Should be handled silently without responding to the user.
///
/// * `InvalidCommand` - Command syntax or arguments are invalid.
///   Contains a user-friendly error message to display.
#[derive(Debug)]
pub enum CommandParseError {
    /// Message is not for this bot (silent error)
    NotForBot,
    /// Invalid command syntax with error message
    InvalidCommand(String),
}
