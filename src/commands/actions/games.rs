//! Games command handler.
//!
//! Lists every active game with its size, status and idle time. This is a
//! read-only command meant for administration and debugging.

use log::debug;

use crate::commands::{CommandContext, CommandResult, markdown_response::format_games};

pub async fn handle_games(context: &CommandContext) -> CommandResult {
    debug!("handling games command");

    let result = CommandResult {
        response: format_games(&context.store.list_active().await),
    };

    debug!("games command result {:?}", result);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{minesweeper::BoardConfig, sessions::SessionStore};

    fn create_test_context() -> CommandContext {
        CommandContext {
            user_id: "@test_user:matrix.org".to_string(),
            store: SessionStore::new(),
            max_side: 30,
            turn_timeout: std::time::Duration::from_secs(120),
        }
    }

    #[tokio::test]
    async fn test_handle_games_without_games() {
        let context = create_test_context();
        let result = handle_games(&context).await;

        assert_eq!(result.response, "No active games found.");
    }

    #[tokio::test]
    async fn test_handle_games_multiple_games() {
        let context = create_test_context();
        context
            .store
            .create_or_replace("@bob:matrix.org", &BoardConfig::new(Some(5), Some(5), None, 30))
            .await;
        context
            .store
            .create_or_replace("@alice:matrix.org", &BoardConfig::new(None, None, None, 30))
            .await;

        let result = handle_games(&context).await;

        let alice = result.response.find("@alice:matrix.org").unwrap();
        let bob = result.response.find("@bob:matrix.org").unwrap();
        assert!(alice < bob);
        assert!(result.response.contains("5x5, 4 mines"));
    }
}
