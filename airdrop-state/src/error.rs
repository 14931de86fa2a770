//! Error types for airdrop-state — Railway Programming
//!
//! All operations return `Result<T, TrackerError>`.
//! No panics, no unwraps in production code paths.

use thiserror::Error;

/// Unified error type for all tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    // ─── Auth Errors ───

    #[error("{field} already registered: {value}")]
    ValidationConflict { field: &'static str, value: String },

    /// Login rejected; carries no detail about which field mismatched
    #[error("Authentication failed")]
    AuthenticationFailure,

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Secret hashing error: {0}")]
    SecretHash(String),

    // ─── Catalog Errors ───

    #[error("Record not found: {0}")]
    NotFound(String),

    // ─── Persistence Errors ───

    #[error("Persisted state corrupt: key={key}, reason={reason}")]
    PersistenceCorrupt { key: String, reason: String },

    // ─── Infrastructure Errors ───

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Actor unavailable: {0}")]
    ActorUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrackerError {
    /// Whether the error is an access-gate refusal rather than a failure
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::AuthorizationDenied(_))
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Serialization(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for TrackerError {
    fn from(err: argon2::password_hash::Error) -> Self {
        TrackerError::SecretHash(err.to_string())
    }
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_classification() {
        assert!(TrackerError::AuthorizationDenied("ranking_added".into()).is_denial());
        assert!(!TrackerError::AuthenticationFailure.is_denial());
        assert!(!TrackerError::NotFound("ranking-1".into()).is_denial());
    }

    #[test]
    fn test_conflict_message() {
        let err = TrackerError::ValidationConflict {
            field: "email",
            value: "a@b.c".into(),
        };
        assert_eq!(err.to_string(), "email already registered: a@b.c");
        assert_eq!(TrackerError::AuthenticationFailure.to_string(), "Authentication failed");
    }
}
