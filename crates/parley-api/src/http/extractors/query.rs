//! Query parameter extractors.
//!
//! Like [`LenientJson`](super::body::LenientJson), these never reject: an
//! unusable query string reads as an empty email and the handler reports
//! the validation error in the usual JSON envelope.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

/// `?email=` on session read endpoints.
///
/// When the parameter is repeated the first value wins.
#[derive(Debug, Default)]
pub struct EmailQuery {
    pub email: String,
}

impl<S> FromRequestParts<S> for EmailQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => pairs,
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable query string, treating as empty");
                return Ok(Self::default());
            }
        };

        let email = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "email").then_some(value))
            .unwrap_or_default();
        Ok(Self { email })
    }
}
