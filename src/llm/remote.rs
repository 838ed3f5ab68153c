use async_trait::async_trait;
use log::{ info, warn, debug };
use reqwest::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use url::Url;
use super::{ ChatBackend, ClientError, DEFAULT_PROTOCOL_ERROR };
use crate::models::api::{ ChatRequest, ChatResponse, ClearResponse, HealthResponse };
use crate::models::chat::ChatMessage;
use crate::models::events::ServerStatus;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const HEALTH_ROUTE: &str = "api/health";
const CHAT_ROUTE: &str = "api/chat";
const CLEAR_ROUTE: &str = "api/clear";

/// HTTP client for the AutoSphere backend endpoints.
#[derive(Debug, Clone)]
pub struct RemoteChatClient {
    http: HttpClient,
    base_url: Url,
}

impl RemoteChatClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_http_client(HttpClient::new(), base_url)
    }

    pub fn with_http_client(http: HttpClient, base_url: &str) -> Result<Self, ClientError> {
        // Url::join drops the last path segment unless the base ends in '/'.
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        Ok(Self {
            http,
            base_url: Url::parse(&normalized)?,
        })
    }

    fn endpoint(&self, route: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(route)?)
    }

    async fn fetch_health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.endpoint(HEALTH_ROUTE)?;
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Transport(format!("HTTP error! status: {}", resp.status())));
        }
        Ok(resp.json::<HealthResponse>().await?)
    }
}

#[async_trait]
impl ChatBackend for RemoteChatClient {
    async fn health_check(&self) -> ServerStatus {
        match self.fetch_health().await {
            Ok(health) if health.is_healthy() => {
                info!("Server is healthy, AI initialized: {}", health.ai_initialized);
                ServerStatus::Connected
            }
            Ok(health) => {
                warn!("Server reported status '{}'", health.status);
                ServerStatus::ServerError
            }
            Err(e) => {
                warn!("Server health check failed: {}", e);
                ServerStatus::Disconnected
            }
        }
    }

    async fn send_chat(
        &self,
        message: &str,
        history: &[ChatMessage]
    ) -> Result<String, ClientError> {
        let url = self.endpoint(CHAT_ROUTE)?;
        let req = ChatRequest {
            message: message.to_string(),
            conversation_history: history.to_vec(),
        };
        debug!("POST {} with {} history entries", url, history.len());

        let resp = self.http.post(url).json(&req).send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Transport(format!("HTTP error! status: {}", resp.status())));
        }

        let data = resp.json::<ChatResponse>().await?;
        if !data.success {
            return Err(
                ClientError::Protocol(
                    data.error.unwrap_or_else(|| DEFAULT_PROTOCOL_ERROR.to_string())
                )
            );
        }
        data.response.ok_or_else(|| ClientError::Protocol("response text missing".to_string()))
    }

    async fn clear_remote(&self) -> Result<(), ClientError> {
        let url = self.endpoint(CLEAR_ROUTE)?;
        let resp = self.http.post(url).header(CONTENT_TYPE, "application/json").send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Transport(format!("HTTP error! status: {}", resp.status())));
        }
        // The body is optional; only log what the server says when it parses.
        if let Ok(body) = resp.json::<ClearResponse>().await {
            debug!(
                "Clear acknowledged: success={}, message={:?}",
                body.success,
                body.message.or(body.error)
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_resolve_against_base_without_trailing_slash() {
        let client = RemoteChatClient::new("http://localhost:8000").unwrap();
        assert_eq!(client.endpoint(CHAT_ROUTE).unwrap().as_str(), "http://localhost:8000/api/chat");
    }

    #[test]
    fn endpoints_keep_base_path_prefix() {
        let client = RemoteChatClient::new("https://example.org/autosphere").unwrap();
        assert_eq!(
            client.endpoint(HEALTH_ROUTE).unwrap().as_str(),
            "https://example.org/autosphere/api/health"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(RemoteChatClient::new("not a url"), Err(ClientError::Transport(_))));
    }
}
