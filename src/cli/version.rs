//! Version and usage text for the finchat CLI.

/// The current version of finchat, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One-line version banner.
pub fn version_line() -> String {
    format!("finchat {}", VERSION)
}

/// Usage text printed by `--help`.
pub fn usage() -> String {
    format!(
        "{}\n\
         Ask the financial assistant a question and stream the answer.\n\n\
         USAGE:\n    finchat [OPTIONS] [PROMPT...]\n\n\
         With a prompt, asks once and exits. Without one, reads questions\n\
         from stdin, one per line. Ctrl-C stops the answer being streamed.\n\n\
         OPTIONS:\n    \
         -h, --help       Print this help\n    \
         -V, --version    Print version\n        \
         --suggest    Print suggested questions\n\n\
         ENVIRONMENT:\n    \
         FINCHAT_CHAT_URL              Streaming chat endpoint\n    \
         FINCHAT_API_KEY               Bearer token for the endpoint\n    \
         FINCHAT_MAX_DECODE_RETRIES    Re-parse attempts for a malformed frame\n    \
         RUST_LOG                      Log filter (default finchat=info)",
        version_line()
    )
}
