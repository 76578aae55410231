use thiserror::Error;

/// Errors from document-store operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("invalid document path: {0}")]
    InvalidPath(String),
}

/// Errors surfaced by the relay operations (login, sessions, chat, history).
///
/// Every variant is terminal for the request that produced it.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Valid email required")]
    InvalidEmail,

    #[error("{0} required")]
    MissingField(&'static str),

    #[error("User not found")]
    UserNotFound,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Model backend error: {0}")]
    Upstream(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl RelayError {
    /// True for errors caused by malformed or missing input.
    pub fn is_validation(&self) -> bool {
        matches!(self, RelayError::InvalidEmail | RelayError::MissingField(_))
    }
}
