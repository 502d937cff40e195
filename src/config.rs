//! Chat client configuration.
//!
//! Use the builder methods to customize a [`ChatConfig`], or read one from
//! the environment with [`ChatConfig::from_env`].
//!
//! # Example
//!
//! ```ignore
//! use finchat::config::ChatConfig;
//!
//! let config = ChatConfig::default()
//!     .with_chat_url("https://api.example.com/functions/v1/financial-chat")
//!     .with_max_decode_retries(5);
//! ```

use thiserror::Error;

use crate::assembler::DEFAULT_MAX_DECODE_RETRIES;

/// Endpoint used when `FINCHAT_CHAT_URL` is not set (local edge functions)
pub const DEFAULT_CHAT_URL: &str = "http://localhost:54321/functions/v1/financial-chat";

pub const ENV_CHAT_URL: &str = "FINCHAT_CHAT_URL";
pub const ENV_API_KEY: &str = "FINCHAT_API_KEY";
pub const ENV_MAX_DECODE_RETRIES: &str = "FINCHAT_MAX_DECODE_RETRIES";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}

/// Settings for talking to the chat backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Streaming chat endpoint
    pub chat_url: String,
    /// Sent as `Authorization: Bearer <key>` when present
    pub api_key: Option<String>,
    /// Re-parse attempts before a malformed data line is dropped
    pub max_decode_retries: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            chat_url: DEFAULT_CHAT_URL.to_string(),
            api_key: None,
            max_decode_retries: DEFAULT_MAX_DECODE_RETRIES,
        }
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chat endpoint URL.
    pub fn with_chat_url(mut self, url: impl Into<String>) -> Self {
        self.chat_url = url.into();
        self
    }

    /// Set the bearer token sent with each request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the decode retry bound.
    pub fn with_max_decode_retries(mut self, retries: u32) -> Self {
        self.max_decode_retries = retries;
        self
    }

    /// Create config from `FINCHAT_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_CHAT_URL) {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::Empty { name: ENV_CHAT_URL });
            }
            config = config.with_chat_url(url);
        }

        // An empty key means "no key"
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            config = config.with_api_key(key.trim());
        }

        if let Some(raw) = lookup(ENV_MAX_DECODE_RETRIES) {
            let retries = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: ENV_MAX_DECODE_RETRIES,
                    value: raw.clone(),
                })?;
            config = config.with_max_decode_retries(retries);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.chat_url, DEFAULT_CHAT_URL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.max_decode_retries, DEFAULT_MAX_DECODE_RETRIES);
    }

    #[test]
    fn test_builder() {
        let config = ChatConfig::new()
            .with_chat_url("https://example.com/chat")
            .with_api_key("secret")
            .with_max_decode_retries(7);
        assert_eq!(config.chat_url, "https://example.com/chat");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.max_decode_retries, 7);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = ChatConfig::from_lookup(lookup_from(&[
            (ENV_CHAT_URL, " https://example.com/chat "),
            (ENV_API_KEY, "k"),
            (ENV_MAX_DECODE_RETRIES, "0"),
        ]))
        .unwrap();
        assert_eq!(config.chat_url, "https://example.com/chat");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.max_decode_retries, 0);
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let config = ChatConfig::from_lookup(lookup_from(&[(ENV_API_KEY, "  ")])).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_invalid_retries_rejected() {
        let err = ChatConfig::from_lookup(lookup_from(&[(ENV_MAX_DECODE_RETRIES, "-1")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                name: ENV_MAX_DECODE_RETRIES,
                value: "-1".to_string()
            }
        );
        assert!(err.to_string().contains("FINCHAT_MAX_DECODE_RETRIES"));
    }

    #[test]
    fn test_empty_url_rejected() {
        let err = ChatConfig::from_lookup(lookup_from(&[(ENV_CHAT_URL, "")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty { name: ENV_CHAT_URL });
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        std::env::set_var(ENV_CHAT_URL, "https://env.example.com/chat");
        std::env::set_var(ENV_MAX_DECODE_RETRIES, "5");
        std::env::remove_var(ENV_API_KEY);

        let config = ChatConfig::from_env().unwrap();

        std::env::remove_var(ENV_CHAT_URL);
        std::env::remove_var(ENV_MAX_DECODE_RETRIES);

        assert_eq!(config.chat_url, "https://env.example.com/chat");
        assert_eq!(config.max_decode_retries, 5);
        assert_eq!(config.api_key, None);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_when_unset() {
        std::env::remove_var(ENV_CHAT_URL);
        std::env::remove_var(ENV_API_KEY);
        std::env::remove_var(ENV_MAX_DECODE_RETRIES);

        assert_eq!(ChatConfig::from_env().unwrap(), ChatConfig::default());
    }
}
