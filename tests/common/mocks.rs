//! Mock configurations for test fixtures.
//!
//! This module re-exports the mock implementations from
//! `finchat::adapters::mock` and builds controllers around them.

pub use finchat::adapters::mock::{MockHttpClient, MockResponse};

use finchat::chat::ChatController;
use finchat::client::ChatClient;
use finchat::config::ChatConfig;

pub const MOCK_CHAT_URL: &str = "https://mock.finchat.test/functions/v1/financial-chat";

/// Creates a controller whose every request gets `response`.
pub fn mock_controller(response: MockResponse) -> ChatController<MockHttpClient> {
    let http = MockHttpClient::new();
    http.set_default_response(response);
    ChatController::with_client(ChatClient::with_http(
        ChatConfig::default().with_chat_url(MOCK_CHAT_URL),
        http,
    ))
}
