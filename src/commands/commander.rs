//! Command orchestration and execution.
//!
//! The [`Commander`] parses messages into [`Command`]s and routes them to
//! their handlers.
//!
//! ```text
//! Matrix Message → parse() → Command → parse_command() → CommandResult
//! ```

use command_parser::Parser;

use crate::commands::{
    CommandContext, CommandParseError, CommandResult,
    actions::{handle_games, handle_help, handle_new_game, handle_quit, handle_spoilers_game},
    command::{Command, format_command_error},
};

/// Command orchestrator for parsing and executing bot commands.
///
/// All commands must start with `!ms` or `!minesweeper`. Other messages are
/// silently ignored (returning [`CommandParseError::NotForBot`]).
pub struct Commander {
    /// Command parser for processing user commands
    parser: Parser,
}

impl Commander {
    /// Creates a new Commander, with `!` as the command prefix and `-` as the
    /// option prefix.
    pub fn new() -> Self {
        let parser = Parser::new('!', '-');
        Commander { parser }
    }

    /// Parses a Matrix message body into a structured command.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sweepbot::commands::Commander;
    /// let commander = Commander::new();
    ///
    /// assert!(commander.parse("!ms new-game 10 10").is_ok());
    /// assert!(commander.parse("Hello, world!").is_err());
    /// assert!(commander.parse("!other_bot help").is_err());
    /// ```
    pub fn parse(&self, body: &str) -> Result<Command, CommandParseError> {
        Command::parse(&self.parser, body).map_err(|error| {
            // Return silently if the command is not for the bot
            // Otherwise, send an error message
            match format_command_error(error) {
                Some(message) => CommandParseError::InvalidCommand(message),
                None => CommandParseError::NotForBot,
            }
        })
    }

    /// Executes a parsed command and returns the reply.
    ///
    /// Returns `None` for [`Command::Click`], turns are played by the
    /// [`TurnController`](crate::turns::TurnController) instead.
    pub async fn parse_command(
        &self,
        command: &Command,
        context: &CommandContext,
    ) -> Option<CommandResult> {
        let result = match command {
            Command::Help => handle_help(context),
            Command::NewGame {
                width,
                height,
                mines,
            } => handle_new_game(context, *width, *height, *mines).await,
            Command::Quit => handle_quit(context).await,
            Command::ListActive => handle_games(context).await,
            Command::SpoilersGame {
                width,
                height,
                mines,
            } => handle_spoilers_game(context, *width, *height, *mines),
            Command::Click { .. } => return None,
        };

        Some(result)
    }
}
