//! Sweepbot - A Matrix bot to play Minesweeper in chat rooms.
//!
//! # Overview
//!
//! Each Matrix user can run one game at a time. A game is started with a
//! command, then played cell by cell: a `click` names the cell, and a
//! reaction on the click message tells what to do with it.
//!
//! # Features
//!
//! - **One Game per Player**: starting a game replaces the previous one
//! - **Safe First Click**: mines are placed after the first reveal, never under it
//! - **Reaction Turns**: reveal, flag, mark or clear a cell by reacting
//! - **Automatic Cleanup**: idle and timed out games are discarded
//! - **Spoilers Boards**: one-shot boards played by uncovering spoilers
//! - **Session Persistence**: the Matrix login survives restarts
//! - **YAML Configuration**: with environment variable overrides
//!
//! # Configuration
//!
//! ```yaml
//! matrix:
//!   user_id: "@sweepbot:matrix.org"
//!   password: "your-password"
//!
//! minesweeper:
//!   turn_timeout: 120
//! ```
//!
//! Every value can be overridden with a `SWEEPBOT_` environment variable:
//!
//! ```bash
//! export SWEEPBOT_MATRIX__USER_ID="@sweepbot:matrix.org"
//! export SWEEPBOT_MATRIX__PASSWORD="your-password"
//! ```
//!
//! # Usage
//!
//! ```bash
//! sweepbot --config config.yaml --data ./data
//! ```
//!
//! # Bot Commands
//!
//! - `!ms help` - Display help information
//! - `!ms new-game [width] [height] [mines]` - Start a game
//! - `!ms click <x> <y>` - Play the cell at column `x`, row `y`
//! - `!ms quit` - Give up the current game
//! - `!ms games` - List the active games
//! - `!ms spoilers-game [width] [height] [mines]` - Post a spoilers board
//!
//! # Architecture
//!
//! - [`bot`] - Wiring of the Matrix client, the commands and the turns
//! - [`commands`] - Command parsing, execution and Markdown replies
//! - [`config`] - YAML configuration with environment variable support
//! - [`matrix`] - Matrix client, login persistence and reactions
//! - [`minesweeper`] - Board, game engine and rendering
//! - [`sessions`] - Per-player games and the sweep of idle ones
//! - [`turns`] - Click turns waiting for one reaction
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod matrix;
mod minesweeper;
mod sessions;
mod turns;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path of the YAML configuration file
    #[arg(short, long)]
    pub config: String,

    /// Directory storing the Matrix login
    #[arg(short, long)]
    pub data: String,
}

#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting sweepbot {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let bot = match Bot::new(config, args).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {}", e);
            return;
        }
    };
    bot.start().await;
}
