//! Matrix protocol integration for the bot.
//!
//! - **Login**: password login, restored from the data directory on restart
//! - **Sync**: auto-join on invite, forwarding of text messages and reactions
//! - **Reactions**: turn input picked by reacting to the click message
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use sweepbot::matrix::{MatrixClient, UserCredentials};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credentials = UserCredentials {
//!     user_id: "@sweepbot:example.com".to_string(),
//!     password: "password".to_string(),
//! };
//!
//! let client = MatrixClient::new(&credentials, Path::new("./data")).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod login;
mod reactions;
mod session;
mod sync;

pub use crate::matrix::client::MatrixClient;
pub use crate::matrix::reactions::{ReactionRouter, ReactionWaiter};

/// User credentials for a Matrix account
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// User ID of the matrix account
    pub user_id: String,
    /// Password of the matrix account
    pub password: String,
}
