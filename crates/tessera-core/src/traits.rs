// crates/tessera-core/src/traits.rs

use crate::error::TesseraError;
use crate::file::File;
use crate::host::{HostPublicKey, HostRecord};

/// Indexed collection of host records.
///
/// Injected into the reputation tracker; the directory's own indexing and
/// persistence are its business. Implementations synchronise internally.
pub trait HostDirectory: Send + Sync {
    /// Look up a host by key. Returns a copy of the stored record.
    fn select(&self, key: &HostPublicKey) -> Result<Option<HostRecord>, TesseraError>;

    /// Replace the stored record keyed by `record.public_key`.
    ///
    /// Returns `TesseraError::NotFound` if no such host is stored.
    fn modify(&self, record: HostRecord) -> Result<(), TesseraError>;
}

/// Durability checkpoint for the renter's file set.
///
/// Called with a snapshot of every file after each successful mutation.
pub trait Persister: Send + Sync {
    fn save(&self, files: &[File]) -> Result<(), TesseraError>;
}

/// Persister that discards every checkpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPersister;

impl Persister for NullPersister {
    fn save(&self, _files: &[File]) -> Result<(), TesseraError> {
        Ok(())
    }
}
