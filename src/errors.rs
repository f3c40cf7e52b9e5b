// src/errors.rs

//! Crate-wide error types.
//!
//! [`SiteplanError`] is what every engine operation returns. The first five
//! variants are the domain taxonomy callers map to responses; the rest are
//! ambient failures (store, config file, IO).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteplanError {
    /// Malformed input: unknown status or dependency type, self-dependency,
    /// missing verification photo, missing rework notes.
    #[error("{0}")]
    Validation(String),

    /// Referenced task/location/template does not exist (or not in this schedule).
    #[error("{0}")]
    NotFound(String),

    /// The lifecycle does not allow this status change from the current state.
    #[error("{0}")]
    InvalidTransition(String),

    /// The proposed dependency edge would close a cycle.
    #[error("{0}")]
    Cycle(String),

    /// The dependency edge already exists.
    #[error("{0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SiteplanError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition(message.into())
    }

    pub fn cycle(message: impl Into<String>) -> Self {
        Self::Cycle(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Status code a request handler should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidTransition(_) => 400,
            Self::NotFound(_) => 404,
            Self::Cycle(_) | Self::Conflict(_) => 409,
            Self::Store(StoreError::Duplicate { .. }) => 409,
            Self::Store(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::TomlDe(_)
            | Self::TomlSer(_)
            | Self::Other(_) => 500,
        }
    }
}

/// Failures reported by the task/graph/template store collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Uniqueness constraint on the (source, target) edge pair.
    #[error("edge {source_id} -> {target_id} already exists")]
    Duplicate { source_id: String, target_id: String },

    #[error("record not found: {0}")]
    Missing(String),

    #[error("{0}")]
    Backend(String),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SiteplanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(SiteplanError::validation("x").status_code(), 400);
        assert_eq!(SiteplanError::invalid_transition("x").status_code(), 400);
        assert_eq!(SiteplanError::not_found("x").status_code(), 404);
        assert_eq!(SiteplanError::cycle("x").status_code(), 409);
        assert_eq!(SiteplanError::conflict("x").status_code(), 409);
        assert_eq!(
            SiteplanError::from(StoreError::Backend("down".into())).status_code(),
            500
        );
    }

    #[test]
    fn domain_errors_display_the_message_verbatim() {
        let err = SiteplanError::cycle("Adding this dependency would create a circular reference");
        assert_eq!(
            err.to_string(),
            "Adding this dependency would create a circular reference"
        );
    }
}
