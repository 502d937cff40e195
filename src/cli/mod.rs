//! CLI module for finchat.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version and usage display
//! - Suggested questions
//!
//! # Usage
//!
//! ```ignore
//! use finchat::cli::{parse_args, run_cli_command, CliCommand};
//!
//! let command = parse_args(std::env::args());
//! if let Some(text) = run_cli_command(&command) {
//!     println!("{}", text);
//!     return Ok(());
//! }
//! // Ask or Repl: talk to the backend
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use version::{usage, version_line, VERSION};

/// Suggested questions offered on an empty chat.
pub const QUICK_PROMPTS: [&str; 4] = [
    "How can I save more money?",
    "Analyze my spending this month",
    "Tips to reduce transport costs",
    "Should I invest now?",
];

/// Render the output of a command that does not need the backend.
///
/// # Returns
///
/// * `None` - for `Ask` and `Repl`, which need a chat session
/// * `Some(text)` - what to print for the informational commands
pub fn run_cli_command(command: &CliCommand) -> Option<String> {
    match command {
        CliCommand::Version => Some(version_line()),
        CliCommand::Help => Some(usage()),
        CliCommand::Suggest => Some(
            QUICK_PROMPTS
                .iter()
                .map(|p| format!("  {}", p))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        CliCommand::Ask(_) | CliCommand::Repl => None,
    }
}
