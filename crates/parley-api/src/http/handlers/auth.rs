//! Login handler.
//!
//! POST /login - create the user on first login, otherwise return it.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use parley_types::chat::UserRecord;

use crate::http::error::AppError;
use crate::http::extractors::body::LenientJson;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: UserRecord,
}

/// POST /login - 201 for a new user, 200 for an existing one.
pub async fn login(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let outcome = state.sessions.ensure_user(&body.email).await?;

    let (status, message) = if outcome.is_created() {
        (StatusCode::CREATED, "New user created")
    } else {
        (StatusCode::OK, "Login successful")
    };

    Ok((
        status,
        Json(LoginResponse {
            message,
            user: outcome.into_user(),
        }),
    ))
}
