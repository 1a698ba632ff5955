//! Axum-based HTTP gateway for the chat page.
//!
//! - `POST /api/chat` runs one chat turn in the caller's conversation
//! - `POST /api/reset` forgets a conversation
//! - `GET /health` reports liveness
//!
//! Request bodies are capped at 64KB and whole requests at the configured
//! timeout.

mod handlers;
mod server;

pub use server::{build_app, build_state, is_public_bind, run_gateway, run_gateway_with_listener};

use crate::agent::ChatAgent;
use crate::prompt::Language;
use crate::session::ConversationStore;
use serde::Deserialize;
use std::sync::Arc;

/// Maximum request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;
/// Longest accepted session id.
pub const MAX_SESSION_ID_LEN: usize = 128;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<ChatAgent>,
    pub conversations: Arc<ConversationStore>,
    pub default_language: Language,
}

/// `POST /api/chat` request body
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// `POST /api/reset` request body. The whole body is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ResetBody {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}
