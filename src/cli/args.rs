//! Command-line argument parsing for finchat.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Print the quick prompts
    Suggest,
    /// Ask a single question and exit
    Ask(String),
    /// Read questions from stdin until EOF (default)
    Repl,
}

/// Parse command-line arguments and return the appropriate command.
///
/// Flags win over a prompt; everything that is not a flag is joined with
/// spaces into the prompt. `--` ends flag parsing.
///
/// # Examples
///
/// ```
/// use finchat::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["finchat".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut words = Vec::new();
    let mut flags_done = false;

    // Skip the program name
    for arg in args.skip(1) {
        if flags_done {
            words.push(arg);
            continue;
        }
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--suggest" => return CliCommand::Suggest,
            "--" => flags_done = true,
            _ => words.push(arg),
        }
    }

    let prompt = words.join(" ");
    if prompt.trim().is_empty() {
        CliCommand::Repl
    } else {
        CliCommand::Ask(prompt)
    }
}
