//! Domain Layer - Error Taxonomy
//!
//! Every failure surfaced by the sync core is one of these kinds. Errors are
//! `Clone` because a single coalesced fetch hands the same outcome to every
//! waiter.

use std::fmt;

use super::wish::WishId;

/// Common result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Failure of one entry inside a batch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub id: WishId,
    pub error: SyncError,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.error)
    }
}

/// Sync-level errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// No token obtainable for an endpoint that requires one
    #[error("Authentication required: {0}")]
    Auth(String),

    /// The server answered with a non-2xx status
    #[error("Request failed with status {status}: {body}")]
    Request { status: u16, body: String },

    /// The server could not be reached at all
    #[error("Network error: {message}")]
    Network { message: String },

    /// The response body matched none of the expected shapes
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Some entries of a batch failed; the rest stay applied
    #[error("{} of the batch failed: {}", .0.len(), join_failures(.0))]
    Batch(Vec<BatchFailure>),
}

impl SyncError {
    pub fn network(message: impl Into<String>) -> Self {
        SyncError::Network {
            message: message.into(),
        }
    }

    /// HTTP status carried by (or implied by) this error; 0 when the server
    /// was never reached or no status applies
    pub fn status(&self) -> u16 {
        match self {
            SyncError::Request { status, .. } => *status,
            SyncError::NotFound(_) => 404,
            SyncError::Conflict(_) => 409,
            _ => 0,
        }
    }

    /// Raw response body kept for diagnostics
    pub fn body(&self) -> Option<&str> {
        match self {
            SyncError::Request { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Ids that failed, for batch errors
    pub fn failed_ids(&self) -> Vec<&WishId> {
        match self {
            SyncError::Batch(failures) => failures.iter().map(|f| &f.id).collect(),
            _ => Vec::new(),
        }
    }
}

fn join_failures(failures: &[BatchFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
