use super::{AppState, ChatBody, MAX_SESSION_ID_LEN, ResetBody};
use crate::prompt::{Language, apology, reset_confirmation};
use crate::session::DEFAULT_SESSION_ID;
use axum::{
    body::Bytes,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

type JsonResponse = (StatusCode, Json<serde_json::Value>);

fn bad_request(message: impl Into<String>) -> JsonResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": message.into()})),
    )
}

/// Session id from the body, `default` when absent. Ids are opaque but kept
/// to a conservative charset so they are safe to log.
fn resolve_session_id(raw: Option<&str>) -> Result<&str, JsonResponse> {
    let Some(id) = raw.map(str::trim).filter(|id| !id.is_empty()) else {
        return Ok(DEFAULT_SESSION_ID);
    };
    if id.len() > MAX_SESSION_ID_LEN {
        return Err(bad_request(format!(
            "session_id must be at most {MAX_SESSION_ID_LEN} characters"
        )));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '-'))
    {
        return Err(bad_request(
            "session_id may only contain letters, digits, '.', '_', ':' and '-'",
        ));
    }
    Ok(id)
}

/// POST /api/chat: run one user message through the conversation
pub(super) async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(chat_body) = match body {
        Ok(b) => b,
        Err(e) => {
            return bad_request(format!(
                "Invalid JSON: {e}. Expected: {{\"message\": \"...\"}}"
            ));
        }
    };

    let Some(message) = chat_body
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
    else {
        return bad_request("message is required");
    };
    let session_id = match resolve_session_id(chat_body.session_id.as_deref()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let lang = Language::parse_or(chat_body.language.as_deref(), state.default_language);

    let handle = state.conversations.get_or_create(session_id);
    let mut conversation = handle.lock().await;

    match state.agent.respond(&mut conversation, message, lang).await {
        Ok(outcome) => {
            tracing::info!(
                session = session_id,
                language = lang.code(),
                model_calls = outcome.model_calls,
                validated = outcome.validation.is_some(),
                collection = %outcome.collection,
                "Chat turn completed"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "message": outcome.reply,
                    "session_id": session_id,
                })),
            )
        }
        Err(e) => {
            tracing::error!(session = session_id, error = %e, "Chat turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": apology(lang)})),
            )
        }
    }
}

/// POST /api/reset: forget a conversation
pub(super) async fn handle_reset(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let reset_body = if body.iter().all(u8::is_ascii_whitespace) {
        ResetBody::default()
    } else {
        match serde_json::from_slice::<ResetBody>(&body) {
            Ok(b) => b,
            Err(e) => return bad_request(format!("Invalid JSON: {e}")),
        }
    };

    let session_id = match resolve_session_id(reset_body.session_id.as_deref()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let lang = Language::parse_or(reset_body.language.as_deref(), state.default_language);

    let existed = state.conversations.reset(session_id);
    tracing::info!(session = session_id, existed, "Conversation reset");
    (
        StatusCode::OK,
        Json(json!({
            "message": reset_confirmation(lang),
            "session_id": session_id,
        })),
    )
}

/// GET /health
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "provider": state.agent.provider_name(),
        "conversations": state.conversations.len(),
    }))
}
