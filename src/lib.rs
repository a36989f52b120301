//! papertalk - terminal companion for a paper-search-and-chat backend.
//!
//! This library provides the core functionality for the papertalk CLI:
//! a client for the backend API, the streaming chat renderer, the session
//! transcript, and the chat TUI.

#![deny(missing_docs)]

include!(concat!(env!("OUT_DIR"), "/version.rs"));

pub mod api;
pub mod cli;
pub mod config;
pub mod stream;
pub mod transcript;
pub mod tui;

// Re-export key types for convenience
pub use stream::{render_stream, ChatView, StreamOutcome};
pub use transcript::Transcript;
