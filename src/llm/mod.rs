pub mod fallback;
pub mod remote;

use async_trait::async_trait;
use thiserror::Error;
use crate::models::chat::ChatMessage;
use crate::models::events::ServerStatus;

pub const DEFAULT_PROTOCOL_ERROR: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure or non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(String),
    /// The backend answered but reported an application-level failure.
    #[error("chat backend error: {0}")]
    Protocol(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Transport(format!("invalid endpoint url: {}", err))
    }
}

/// Network boundary to the chat backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Classifies the backend's health endpoint. Never fails: an unreachable
    /// backend is `Disconnected`, a reachable but unhealthy one `ServerError`.
    async fn health_check(&self) -> ServerStatus;

    async fn send_chat(
        &self,
        message: &str,
        history: &[ChatMessage]
    ) -> Result<String, ClientError>;

    /// Tells the backend the session was reset.
    async fn clear_remote(&self) -> Result<(), ClientError>;
}
