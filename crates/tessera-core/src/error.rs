// crates/tessera-core/src/error.rs

use thiserror::Error;

/// Workspace-wide error types for Tessera.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TesseraError {
    /// Resource not found (file name, host key, contract).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A resource with the same identity is already present.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// An operation would violate a structural invariant.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration values are out of their permitted range.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Persistence hook failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A lock guarding shared state was poisoned by a panicking holder.
    #[error("Lock error: {0}")]
    Lock(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TesseraError {
    fn from(e: serde_json::Error) -> Self {
        TesseraError::Serialization(e.to_string())
    }
}
