//! Command action handlers.
//!
//! Individual handler functions for each bot command. Each handler receives a
//! [`CommandContext`](crate::commands::CommandContext), applies the command to
//! the session store and returns a [`CommandResult`](crate::commands::CommandResult).
//!
//! # Available Handlers
//!
//! - [`handle_help`] - Display help information
//! - [`handle_new_game`] - Start a new game, replacing the previous one
//! - [`handle_quit`] - Give up the current game
//! - [`handle_games`] - List the active games
//! - [`handle_spoilers_game`] - One-shot board hidden behind spoilers

mod games;
mod help;
mod new_game;
mod quit;
mod spoilers_game;

pub use crate::commands::actions::{
    games::handle_games, help::handle_help, new_game::handle_new_game, quit::handle_quit,
    spoilers_game::handle_spoilers_game,
};
