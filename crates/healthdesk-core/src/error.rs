//! Error types for intake, persistence, and the chatbot oracle.

use std::time::Duration;

/// A submission was missing one or more required fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    /// Required field names that were absent or falsy, in declaration order.
    pub missing: Vec<&'static str>,
}

/// Errors from the persistence adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sled: {0}")]
    Sled(#[from] sled::Error),

    #[error("record encoding: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("store call exceeded {0:?}")]
    Timeout(Duration),

    #[error("store worker failed: {0}")]
    Worker(String),

    #[error("field `{field}` cannot be stored as text")]
    Cast { field: &'static str },
}

/// Errors from the external text-completion oracle. Never surfaced past the responder.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("oracle returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle response malformed: {0}")]
    Malformed(String),

    #[error("oracle call exceeded {0:?}")]
    Timeout(Duration),
}

/// Outcome of a failed form submission, as reported to the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] StoreError),
}
