//! Configuration of the bot.
//!
//! The configuration is read from a YAML file, each value can be overridden
//! by an environment variable prefixed with `SWEEPBOT_`, sections being
//! separated by a double underscore.
//!
//! ```yaml
//! matrix:
//!   # Fully qualified Matrix user ID of the bot account
//!   user_id: "@sweepbot:matrix.org"
//!   password: "secret-password"
//!
//! # Optional, the values below are the defaults
//! minesweeper:
//!   # Seconds a player has to pick a reaction after a click
//!   turn_timeout: 120
//!   # Seconds between two sweeps of the idle games
//!   sweep_interval: 60
//!   # Seconds of inactivity after which a game is discarded
//!   stale_threshold: 120
//!   # Largest board side
//!   max_side: 30
//! ```
//!
//! ```bash
//! export SWEEPBOT_MATRIX__PASSWORD="secret-password"
//! export SWEEPBOT_MINESWEEPER__TURN_TIMEOUT=60
//! ```

use std::{path::Path, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Root configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Matrix account configuration
    pub matrix: Matrix,
    /// Game settings
    #[serde(default)]
    pub minesweeper: Minesweeper,
}

/// Matrix account configuration.
#[derive(Debug, Deserialize)]
pub struct Matrix {
    /// Fully qualified Matrix user ID, `@username:homeserver.com`
    pub user_id: String,

    /// Matrix account password.
    ///
    /// Only used for the first login, the session is then restored from the
    /// data directory.
    pub password: String,
}

/// Game settings, durations are in seconds.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Minesweeper {
    pub turn_timeout: u64,
    pub sweep_interval: u64,
    pub stale_threshold: u64,
    pub max_side: usize,
}

impl Default for Minesweeper {
    fn default() -> Self {
        Minesweeper {
            turn_timeout: 120,
            sweep_interval: 60,
            stale_threshold: 120,
            max_side: 30,
        }
    }
}

impl Minesweeper {
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    pub fn stale_threshold(&self) -> Duration {
        Duration::from_secs(self.stale_threshold)
    }
}

impl Config {
    /// Loads the YAML file at `path`, then applies the `SWEEPBOT_` overrides.
    ///
    /// # Errors
    ///
    /// Fails if a required value is missing or a value has the wrong type.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Config> {
        let config = Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("SWEEPBOT_").split("__"))
            .extract()?;

        Ok(config)
    }
}
