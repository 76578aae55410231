//! Raw per-user history.
//!
//! Endpoints:
//! - GET  /history/{username} - Both history arrays
//! - POST /history/{username} - Merge `{user_msg?, agent_msg?}`

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use parley_types::history::{ConversationHistory, HistoryEntry};

use crate::http::error::AppError;
use crate::http::extractors::body::LenientJson;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub message: &'static str,
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ConversationHistory>, AppError> {
    Ok(Json(state.history_service.get_history(&username).await?))
}

pub async fn add_history(
    State(state): State<AppState>,
    Path(username): Path<String>,
    LenientJson(entry): LenientJson<HistoryEntry>,
) -> Result<Json<AckResponse>, AppError> {
    state.history_service.add_history(&username, &entry).await?;
    Ok(Json(AckResponse {
        message: "History updated successfully",
    }))
}
