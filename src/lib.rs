//! finchat - streaming chat client for a personal-finance assistant
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod assembler;
pub mod chat;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod sse;
pub mod traits;
