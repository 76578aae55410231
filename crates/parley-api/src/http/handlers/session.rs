//! Session handlers.
//!
//! Endpoints:
//! - GET  /sessions?email=      - List the user's session ids
//! - POST /session              - Create an empty session
//! - GET  /session/{id}?email=  - Read a session transcript

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use parley_types::chat::Message;

use crate::http::error::AppError;
use crate::http::extractors::body::LenientJson;
use crate::http::extractors::query::EmailQuery;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

/// GET /sessions - An unknown user has no sessions.
pub async fn list_sessions(
    State(state): State<AppState>,
    query: EmailQuery,
) -> Result<Json<SessionListResponse>, AppError> {
    let sessions = state.sessions.list_sessions(&query.email).await?;
    Ok(Json(SessionListResponse { sessions }))
}

/// POST /session
pub async fn create_session(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let session_id = state.sessions.create_session(&body.email).await?;
    Ok((StatusCode::CREATED, Json(CreateSessionResponse { session_id })))
}

/// GET /session/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    query: EmailQuery,
) -> Result<Json<MessagesResponse>, AppError> {
    let messages = state.sessions.get_messages(&query.email, &session_id).await?;
    Ok(Json(MessagesResponse { messages }))
}
