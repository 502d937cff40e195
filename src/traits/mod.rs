//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Streaming POST against the chat backend

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError, StreamResponse};
