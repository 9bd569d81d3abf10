//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agent_core::{Message, Session, SessionId, provider::ModelInfo};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub llm_provider: String,
    pub llm_connected: bool,
    pub exchange: String,
    pub exchange_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub message_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.to_string(),
            title: session.title(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            messages: session.transcript.messages().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn session_not_found(id: &str) -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        format!("Session '{id}' not found"),
        "SESSION_NOT_FOUND",
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (llm_connected, exchange_connected) = tokio::join!(
        state.provider.health_check(),
        state.market.exchange().health_check(),
    );

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        llm_provider: state.provider.name().to_string(),
        llm_connected: llm_connected.unwrap_or(false),
        exchange: state.market.exchange().name().to_string(),
        exchange_connected,
    })
}

/// Models offered by the LLM endpoint
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModelInfo>>, ApiError> {
    state.provider.list_models().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "Failed to list models");
        api_error(StatusCode::BAD_GATEWAY, e.user_message(), "PROVIDER_ERROR")
    })
}

/// Open a new chat session
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let shared = state.open_session().await;
    let session = shared.lock().await;
    (StatusCode::CREATED, Json(SessionResponse::from(&*session)))
}

/// Transcript of one session
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let shared = state
        .sessions
        .get(&SessionId::from_string(id.as_str()))
        .await
        .ok_or_else(|| session_not_found(&id))?;

    let session = shared.lock().await;
    Ok(Json(SessionResponse::from(&*session)))
}

/// End a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&SessionId::from_string(id.as_str())).await {
        tracing::info!(session_id = %id, "Session closed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(&id))
    }
}

/// Run one chat turn
///
/// Without a `session_id` a fresh session is opened first. Turns on the same
/// session queue behind its lock.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Message must not be empty",
            "EMPTY_MESSAGE",
        ));
    }

    let shared = match payload.session_id.as_deref() {
        Some(id) => state
            .sessions
            .get(&SessionId::from_string(id))
            .await
            .ok_or_else(|| session_not_found(id))?,
        None => state.open_session().await,
    };

    let mut session = shared.lock().await;
    let reply = state
        .dispatcher
        .handle_turn(&mut session.transcript, &payload.message)
        .await;
    session.touch();

    tracing::debug!(session_id = %session.id, messages = session.message_count(), "Turn complete");

    Ok(Json(ChatResponse {
        session_id: session.id.to_string(),
        reply,
        message_count: session.message_count(),
    }))
}
