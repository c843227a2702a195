//! Axum route handlers for the Chat API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::chain::{ProviderChain, GENERIC_APOLOGY};
use crate::chat::commands::{plan_commands, UiCommand};
use crate::chat::directives::parse_directives;
use crate::chat::session::{ChatSession, SessionAccess};
use crate::errors::AppError;
use crate::llm_client::GenerationContext;
use crate::models::chat::{ChatMessage, Role};
use crate::state::AppState;

/// Longest accepted user message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 1000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub message_id: Uuid,
    pub content: String,
    pub actions: Vec<String>,
    pub nav_actions: Vec<String>,
    pub commands: Vec<UiCommand>,
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub available: Vec<String>,
}

impl From<SessionAccess> for AppError {
    fn from(access: SessionAccess) -> Self {
        match access {
            SessionAccess::NotFound => AppError::NotFound("Chat session not found".to_string()),
            SessionAccess::Busy => AppError::Conflict(
                "A request is already in progress for this session".to_string(),
            ),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/chat
///
/// Appends the user's message, generates a reply through the provider chain,
/// strips directive markers, and returns the clean text with a UI command plan.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    validate_message(&request.message)?;

    let session_id = match request.session_id {
        Some(id) => id,
        None => state.sessions.create(),
    };
    let mut session = state.sessions.acquire(session_id)?;

    let response = run_turn(
        &mut session,
        &state.chain,
        &state.generation_context,
        &request.message,
    )
    .await;

    Ok(Json(response))
}

/// GET /api/v1/chat/:session_id
pub async fn handle_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .ok_or(SessionAccess::NotFound)?;
    let session = session.lock().await;

    Ok(Json(HistoryResponse {
        session_id,
        messages: session.messages().to_vec(),
    }))
}

/// DELETE /api/v1/chat/:session_id
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .ok_or(SessionAccess::NotFound)?;
    session.lock().await.reset();
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/chat/providers
pub async fn handle_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        available: state.chain.available_providers(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Turn orchestration
// ────────────────────────────────────────────────────────────────────────────

/// One user → assistant exchange on an exclusively held session.
///
/// Both messages are recorded only once the reply is ready, so a turn dropped
/// mid-generation leaves the history untouched.
pub async fn run_turn(
    session: &mut ChatSession,
    chain: &ProviderChain,
    context: &GenerationContext,
    message: &str,
) -> ChatResponse {
    let reply = chain.select_and_generate(message, context).await;
    let parsed = parse_directives(&reply.text);

    let content = if parsed.clean_text.is_empty() {
        GENERIC_APOLOGY.to_string()
    } else {
        parsed.clean_text
    };
    let commands = plan_commands(&parsed.actions, &parsed.nav_actions);
    session.push(Role::User, message);
    let message_id = session.push(Role::Assistant, content.clone()).id;

    ChatResponse {
        session_id: session.id,
        message_id,
        content,
        actions: parsed.actions,
        nav_actions: parsed.nav_actions,
        commands,
        provider: reply.provider,
    }
}

fn validate_message(message: &str) -> Result<(), AppError> {
    if message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(AppError::Validation(format!(
            "message must be at most {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}
