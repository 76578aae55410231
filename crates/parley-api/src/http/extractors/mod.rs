//! Request extractors.

pub mod body;
pub mod query;
