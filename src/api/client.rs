//! Blocking client for the paper assistant backend.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::Url;

use super::types::{
    ChatMode, MessageRequest, Paper, SearchRequest, SectionsRequest, SectionsResponse,
    SettingsAck, SettingsRequest,
};
use super::ApiError;

/// Client for the backend HTTP API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the given server base URL.
    ///
    /// The timeout applies to the request/response endpoints only; chat
    /// streams read without a client-side deadline.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("papertalk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url })
    }

    /// The configured server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    /// Search for papers: `POST /api/search`.
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<Paper>, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/api/search")?)
            .json(request)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    /// Push model settings to the backend: `POST /api/settings`.
    pub fn save_settings(&self, request: &SettingsRequest) -> Result<SettingsAck, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/api/settings")?)
            .json(request)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    /// Fetch a paper's section outline: `POST /api/pdf/sections`.
    pub fn pdf_sections(&self, request: &SectionsRequest) -> Result<SectionsResponse, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/api/pdf/sections")?)
            .json(request)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    /// Start a streaming chat request for the given mode.
    ///
    /// Returns once response headers arrive; the body streams through the
    /// returned [`ChatStream`]. Streaming requests use their own client
    /// without a timeout, since a chat response legitimately takes longer
    /// than any request/response deadline.
    pub fn chat(&self, mode: ChatMode, message: &str) -> Result<ChatStream, ApiError> {
        let streaming_http = Client::builder()
            .user_agent(concat!("papertalk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let response = streaming_http
            .post(self.endpoint(mode.path())?)
            .json(&MessageRequest {
                message: message.to_string(),
            })
            .send()?
            .error_for_status()?;
        Ok(ChatStream { response })
    }
}

/// A streaming chat response body.
///
/// Implements [`Read`]; chunks arrive as the backend flushes them.
#[derive(Debug)]
pub struct ChatStream {
    response: Response,
}

impl Read for ChatStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.response.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let result = ApiClient::new("not a url", 30);
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let client = ApiClient::new("http://localhost:1999", 30).unwrap();
        let url = client.endpoint("/api/search").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1999/api/search");
    }

    #[test]
    fn test_endpoint_replaces_base_path() {
        // Joining an absolute path replaces any path on the base URL.
        let client = ApiClient::new("http://localhost:1999/ignored", 30).unwrap();
        let url = client.endpoint("/api/settings").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1999/api/settings");
    }

    #[test]
    fn test_chat_endpoints_per_mode() {
        let client = ApiClient::new("http://localhost:1999", 30).unwrap();
        for mode in ChatMode::ALL {
            let url = client.endpoint(mode.path()).unwrap();
            assert!(url.path().starts_with("/api/"));
        }
    }
}
