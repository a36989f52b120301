//! HTTP client for the paper assistant backend.
//!
//! The backend owns search, model settings, streaming chat, and PDF section
//! parsing; this module owns the wire formats and a blocking client for
//! them. Chat responses stream; everything else is request/response JSON.

pub mod client;
pub mod types;

pub use client::{ApiClient, ChatStream};
pub use types::{
    ChatMode, MessageRequest, Paper, SearchRequest, SectionsRequest, SectionsResponse,
    SettingsAck, SettingsRequest,
};

/// Error type for backend API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configured server URL (or a joined endpoint) did not parse.
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
    /// HTTP request failed (transport, timeout, or non-success status).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}
