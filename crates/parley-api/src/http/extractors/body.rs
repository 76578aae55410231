//! Lenient JSON body extractor.
//!
//! A missing, empty, or malformed body deserializes as `T::default()`, so a
//! bad request surfaces as the field-level validation error of the handler
//! instead of a JSON rejection.

use std::convert::Infallible;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

/// JSON body that never rejects.
#[derive(Debug)]
pub struct LenientJson<T>(pub T);

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = match Bytes::from_request(req, state).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable request body, treating as empty");
                return Ok(Self(T::default()));
            }
        };

        if bytes.is_empty() {
            return Ok(Self(T::default()));
        }

        let value = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Malformed JSON body, treating as empty");
            T::default()
        });
        Ok(Self(value))
    }
}
