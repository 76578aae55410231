//! HTTP/REST API layer for Parley.
//!
//! Axum router with flat JSON request/response bodies, any-origin CORS, and
//! request tracing.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
