//! Command parsing and handling.
//!
//! This module converts Matrix message text into structured [`Command`] enums.
//! Commands look like `!ms <subcommand> [args...]`, `!minesweeper` being
//! accepted as well.

use command_parser::{Command as ParserCommand, Parser};
use log::debug;

use crate::commands::markdown_response::{
    format_invalid_click, format_invalid_new_game, format_invalid_spoilers_game,
    format_unknown_command,
};

const COMMAND_NAMES: [&str; 2] = ["ms", "minesweeper"];

/// Represents a parsed bot command.
#[derive(Debug, Hash, PartialEq, Eq)]
pub enum Command {
    /// Display help information
    Help,
    /// Start a new game, replacing the current one
    NewGame {
        width: Option<i64>,
        height: Option<i64>,
        mines: Option<i64>,
    },
    /// Click a cell, 1-based with `x` the column and `y` the row
    Click { x: i64, y: i64 },
    /// Give up the current game
    Quit,
    /// List every active game
    ListActive,
    /// One-shot board with every covered cell behind a spoiler
    SpoilersGame {
        width: Option<i64>,
        height: Option<i64>,
        mines: Option<i64>,
    },
}

/// Errors that can occur during command parsing.
#[derive(Debug)]
pub enum CommandParsingError {
    /// The message could not be parsed as a command
    UnableToParse,
    /// The command is for another bot
    NotMinesweeper,
    /// The subcommand is not recognized
    Unknown,
    /// new-game arguments are not integers
    InvalidNewGame,
    /// spoilers-game arguments are not integers
    InvalidSpoilersGame,
    /// click needs two integer coordinates
    InvalidClick,
}

impl Command {
    /// Parses a message string into a Command.
    ///
    /// # Examples
    ///
    /// ```
    /// # use command_parser::Parser;
    /// # use sweepbot::commands::command::Command;
    /// let parser = Parser::new('!', '-');
    /// let result = Command::parse(&parser, "!ms click 3 4");
    /// assert!(matches!(result, Ok(Command::Click { x: 3, y: 4 })));
    /// ```
    pub fn parse(parser: &Parser, body: &str) -> Result<Self, CommandParsingError> {
        // For an unknown reason the parser ignores the last word, so we add a dummy word at the end
        let body = body.to_string() + " dummy";

        // This is normal to fails if the message is not a command
        let command = match parser.parse(&body) {
            Ok(cmd) => cmd,
            Err(_) => return Err(CommandParsingError::UnableToParse),
        };

        // Ignore commands that are not for the bot
        if !COMMAND_NAMES.contains(&command.name.as_str()) {
            return Err(CommandParsingError::NotMinesweeper);
        }

        debug!("Parsing command: {:?}", command);

        // If no arguments, return help
        if command.arguments.is_empty() {
            return Ok(Command::Help);
        }

        match command.arguments[0].as_str() {
            "help" => Ok(Command::Help),
            "new-game" | "ng" | "n-g" => {
                let (width, height, mines) = Self::parse_board_arguments(&command)
                    .ok_or(CommandParsingError::InvalidNewGame)?;
                Ok(Command::NewGame {
                    width,
                    height,
                    mines,
                })
            }
            "click" | "c" => {
                let (x, y) = Self::parse_click(&command)?;
                Ok(Command::Click { x, y })
            }
            "quit" | "quit-game" | "q" => Ok(Command::Quit),
            "games" | "list" => Ok(Command::ListActive),
            "spoilers-game" | "sg" | "s-g" => {
                let (width, height, mines) = Self::parse_board_arguments(&command)
                    .ok_or(CommandParsingError::InvalidSpoilersGame)?;
                Ok(Command::SpoilersGame {
                    width,
                    height,
                    mines,
                })
            }
            _ => Err(CommandParsingError::Unknown),
        }
    }

    /// Up to three optional integers: width, height and mines.
    fn parse_board_arguments(
        command: &ParserCommand,
    ) -> Option<(Option<i64>, Option<i64>, Option<i64>)> {
        let values = command.arguments[1..]
            .iter()
            .map(|argument| argument.parse::<i64>().ok())
            .collect::<Option<Vec<i64>>>()?;

        if values.len() > 3 {
            return None;
        }

        debug!("Parsed board arguments: {:?}", values);

        Some((
            values.first().copied(),
            values.get(1).copied(),
            values.get(2).copied(),
        ))
    }

    fn parse_click(command: &ParserCommand) -> Result<(i64, i64), CommandParsingError> {
        debug!("Parsing click command: {:?}", command);

        // 3 arguments: click, x and y
        if command.arguments.len() != 3 {
            return Err(CommandParsingError::InvalidClick);
        }

        let parse = |argument: &String| {
            argument
                .parse::<i64>()
                .map_err(|_| CommandParsingError::InvalidClick)
        };

        Ok((parse(&command.arguments[1])?, parse(&command.arguments[2])?))
    }
}

/// Formats a command error into a user-friendly message.
///
/// Messages that are not commands or are meant for another bot give `None`,
/// the bot stays silent on them.
pub fn format_command_error(error: CommandParsingError) -> Option<String> {
    match error {
        CommandParsingError::Unknown => Some(format_unknown_command()),
        CommandParsingError::InvalidNewGame => Some(format_invalid_new_game()),
        CommandParsingError::InvalidSpoilersGame => Some(format_invalid_spoilers_game()),
        CommandParsingError::InvalidClick => Some(format_invalid_click()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_parser() -> Parser {
        Parser::new('!', '-')
    }

    #[test]
    fn test_parse_help_command() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ms help");
        assert!(matches!(result, Ok(Command::Help)));
    }

    #[test]
    fn test_parse_help_command_no_args() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ms");
        assert!(matches!(result, Ok(Command::Help)));
    }

    #[test]
    fn test_parse_long_command_name() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!minesweeper games");
        assert!(matches!(result, Ok(Command::ListActive)));
    }

    #[test]
    fn test_parse_new_game_defaults() {
        let parser = create_parser();
        for body in ["!ms new-game", "!ms ng", "!ms n-g"] {
            assert_eq!(
                Command::parse(&parser, body).unwrap(),
                Command::NewGame {
                    width: None,
                    height: None,
                    mines: None
                }
            );
        }
    }

    #[test]
    fn test_parse_new_game_with_arguments() {
        let parser = create_parser();
        assert_eq!(
            Command::parse(&parser, "!ms new-game 10 12").unwrap(),
            Command::NewGame {
                width: Some(10),
                height: Some(12),
                mines: None
            }
        );
        assert_eq!(
            Command::parse(&parser, "!ms ng 5 4 3").unwrap(),
            Command::NewGame {
                width: Some(5),
                height: Some(4),
                mines: Some(3)
            }
        );
    }

    #[test]
    fn test_parse_new_game_invalid_arguments() {
        let parser = create_parser();
        assert!(matches!(
            Command::parse(&parser, "!ms new-game big"),
            Err(CommandParsingError::InvalidNewGame)
        ));
        assert!(matches!(
            Command::parse(&parser, "!ms new-game 1 2 3 4"),
            Err(CommandParsingError::InvalidNewGame)
        ));
    }

    #[test]
    fn test_parse_spoilers_game() {
        let parser = create_parser();
        for body in ["!ms spoilers-game 6", "!ms sg 6", "!ms s-g 6"] {
            assert_eq!(
                Command::parse(&parser, body).unwrap(),
                Command::SpoilersGame {
                    width: Some(6),
                    height: None,
                    mines: None
                }
            );
        }
        assert!(matches!(
            Command::parse(&parser, "!ms sg six"),
            Err(CommandParsingError::InvalidSpoilersGame)
        ));
    }

    #[test]
    fn test_parse_click_command() {
        let parser = create_parser();
        assert_eq!(
            Command::parse(&parser, "!ms click 3 4").unwrap(),
            Command::Click { x: 3, y: 4 }
        );
        assert_eq!(
            Command::parse(&parser, "!ms c 1 8").unwrap(),
            Command::Click { x: 1, y: 8 }
        );
    }

    #[test]
    fn test_parse_click_command_invalid() {
        let parser = create_parser();
        for body in ["!ms click", "!ms click 3", "!ms click a b", "!ms click 1 2 3"] {
            assert!(matches!(
                Command::parse(&parser, body),
                Err(CommandParsingError::InvalidClick)
            ));
        }
    }

    #[test]
    fn test_parse_quit_command() {
        let parser = create_parser();
        for body in ["!ms quit", "!ms quit-game", "!ms q"] {
            assert!(matches!(Command::parse(&parser, body), Ok(Command::Quit)));
        }
    }

    #[test]
    fn test_parse_games_command() {
        let parser = create_parser();
        for body in ["!ms games", "!ms list"] {
            assert!(matches!(
                Command::parse(&parser, body),
                Ok(Command::ListActive)
            ));
        }
    }

    #[test]
    fn test_parse_unknown_command() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ms unknown");
        assert!(matches!(result, Err(CommandParsingError::Unknown)));
    }

    #[test]
    fn test_parse_other_bot_command() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!other_bot help");
        assert!(matches!(result, Err(CommandParsingError::NotMinesweeper)));
    }

    #[test]
    fn test_parse_unable_to_parse() {
        let parser = create_parser();
        let result = Command::parse(&parser, "This is not a command");
        assert!(matches!(result, Err(CommandParsingError::UnableToParse)));
    }

    #[test]
    fn test_format_command_error() {
        assert!(
            format_command_error(CommandParsingError::Unknown)
                .unwrap()
                .contains("Unknown command")
        );
        assert!(
            format_command_error(CommandParsingError::InvalidClick)
                .unwrap()
                .contains("Invalid click")
        );
        assert!(
            format_command_error(CommandParsingError::InvalidNewGame)
                .unwrap()
                .contains("Invalid new-game")
        );
        assert!(format_command_error(CommandParsingError::UnableToParse).is_none());
        assert!(format_command_error(CommandParsingError::NotMinesweeper).is_none());
    }
}
