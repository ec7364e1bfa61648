//! Help command handler.
//!
//! Stateless apart from the configured turn timeout it mentions.

use log::debug;

use crate::commands::{CommandContext, CommandResult, markdown_response::format_help};

pub fn handle_help(context: &CommandContext) -> CommandResult {
    debug!("handling help command");

    CommandResult {
        response: format_help(context.turn_timeout),
    }
}
