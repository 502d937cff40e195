//! Chat API client for backend communication.
//!
//! This module sends the chat history to the streaming endpoint and hands
//! back the raw response body once the status gate has passed. Turning that
//! body into message content is the assembler's job.

use futures_util::StreamExt;
use tracing::{debug, info, warn};

use crate::adapters::ReqwestHttpClient;
use crate::config::ChatConfig;
use crate::error::{ChatError, ChatResult};
use crate::models::ChatRequest;
use crate::traits::{ByteStream, Headers, HttpClient};

/// Client for the streaming chat endpoint.
///
/// Generic over the transport so tests can script responses with
/// [`MockHttpClient`](crate::adapters::MockHttpClient).
pub struct ChatClient<H: HttpClient = ReqwestHttpClient> {
    config: ChatConfig,
    http: H,
}

impl ChatClient<ReqwestHttpClient> {
    /// Create a client backed by reqwest.
    pub fn new(config: ChatConfig) -> Self {
        Self::with_http(config, ReqwestHttpClient::new())
    }
}

impl<H: HttpClient> ChatClient<H> {
    /// Create a client over a custom transport.
    pub fn with_http(config: ChatConfig, http: H) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    fn request_headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        if let Some(key) = &self.config.api_key {
            headers.insert("Authorization".to_string(), format!("Bearer {}", key));
        }
        headers
    }

    /// Send the conversation and return the response body stream.
    ///
    /// 429 and 402 are rejected before any body byte is read. Any other
    /// non-success status, or a success without a body, is a transport error.
    pub async fn open_stream(&self, request: &ChatRequest) -> ChatResult<ByteStream> {
        let body = serde_json::to_string(request).map_err(|e| ChatError::Transport {
            status: None,
            message: format!("Failed to encode request: {}", e),
        })?;

        debug!(
            "POST {} ({} messages)",
            self.config.chat_url,
            request.messages.len()
        );
        let response = self
            .http
            .post_stream(&self.config.chat_url, &body, &self.request_headers())
            .await
            .map_err(|e| {
                warn!("Chat request failed: {}", e);
                ChatError::from(e)
            })?;

        let status = response.status;
        if status == 429 || status == 402 {
            let err = ChatError::from_status(status, "");
            warn!("Chat request rejected: {} ({})", err, err.error_code());
            return Err(err);
        }

        if !response.is_success() {
            let message = match response.body {
                Some(body) => read_error_body(body).await,
                None => "Unknown error".to_string(),
            };
            warn!("Chat request failed with status {}: {}", status, message);
            return Err(ChatError::from_status(status, message));
        }

        match response.body {
            Some(body) => {
                info!("Chat stream opened (status {})", status);
                Ok(body)
            }
            None => {
                warn!("Chat response had no body (status {})", status);
                Err(ChatError::Transport {
                    status: Some(status),
                    message: "Response has no body".to_string(),
                })
            }
        }
    }
}

/// Collect an error response body as text.
async fn read_error_body(mut body: ByteStream) -> String {
    let mut bytes = Vec::new();
    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(chunk) => bytes.extend_from_slice(&chunk),
            Err(_) => break,
        }
    }
    let text = String::from_utf8_lossy(&bytes).trim().to_string();
    if text.is_empty() {
        "Unknown error".to_string()
    } else {
        text
    }
}
