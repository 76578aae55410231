//! Axum router configuration with middleware.
//!
//! Middleware: CORS (any origin), request tracing.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .route("/login", post(handlers::auth::login))
        .route("/sessions", get(handlers::session::list_sessions))
        .route("/session", post(handlers::session::create_session))
        .route("/session/{id}", get(handlers::session::get_session))
        .route("/chat", post(handlers::chat::chat))
        .route(
            "/history/{username}",
            get(handlers::history::get_history).post(handlers::history::add_history),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - Liveness banner.
async fn banner() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "message": "Parley chat relay running",
    }))
}

/// GET /health - Version and configured backend.
async fn health_check(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.chat_service.provider_name(),
        "model": state.config.llm.model,
    }))
}
