//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client that replays scripted chunks

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
