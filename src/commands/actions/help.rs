//! Help command handler.
//!
//! Displays every available command and a short reminder of the rules.

use log::debug;

use crate::commands::{CommandResult, markdown_response::format_help};

/// Returns formatted help information about available commands.
pub fn handle_help() -> CommandResult {
    debug!("handling help command");

    CommandResult {
        response: Some(format_help()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_help() {
        let result = handle_help();
        assert!(!result.response.unwrap().is_empty());
    }
}
