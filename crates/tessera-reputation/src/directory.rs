// crates/tessera-reputation/src/directory.rs
//
// In-memory host directory implementing the `HostDirectory` trait.
//
// Sufficient for a single renter process and for tests. A persistent or
// weighted-tree directory can be swapped in behind the same trait.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use tessera_core::error::TesseraError;
use tessera_core::host::{HostPublicKey, HostRecord};
use tessera_core::traits::HostDirectory;

/// Host records keyed by public key.
#[derive(Debug, Default)]
pub struct InMemoryHostDirectory {
    hosts: RwLock<BTreeMap<HostPublicKey, HostRecord>>,
}

impl InMemoryHostDirectory {
    /// Create a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a host record. Returns the previous record, if any.
    pub fn insert(&self, record: HostRecord) -> Result<Option<HostRecord>, TesseraError> {
        let mut hosts = self
            .hosts
            .write()
            .map_err(|e| TesseraError::Lock(format!("RwLock poisoned: {}", e)))?;
        Ok(hosts.insert(record.public_key, record))
    }

    /// Remove a host. Returns the removed record, if any.
    pub fn remove(&self, key: &HostPublicKey) -> Result<Option<HostRecord>, TesseraError> {
        let mut hosts = self
            .hosts
            .write()
            .map_err(|e| TesseraError::Lock(format!("RwLock poisoned: {}", e)))?;
        Ok(hosts.remove(key))
    }

    /// Return the number of hosts currently stored.
    pub fn len(&self) -> usize {
        self.hosts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Return whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies of every record, ordered by key.
    pub fn records(&self) -> Result<Vec<HostRecord>, TesseraError> {
        let hosts = self
            .hosts
            .read()
            .map_err(|e| TesseraError::Lock(format!("RwLock poisoned: {}", e)))?;
        Ok(hosts.values().cloned().collect())
    }
}

impl HostDirectory for InMemoryHostDirectory {
    fn select(&self, key: &HostPublicKey) -> Result<Option<HostRecord>, TesseraError> {
        let hosts = self
            .hosts
            .read()
            .map_err(|e| TesseraError::Lock(format!("RwLock poisoned: {}", e)))?;
        Ok(hosts.get(key).cloned())
    }

    fn modify(&self, record: HostRecord) -> Result<(), TesseraError> {
        let mut hosts = self
            .hosts
            .write()
            .map_err(|e| TesseraError::Lock(format!("RwLock poisoned: {}", e)))?;
        match hosts.get_mut(&record.public_key) {
            Some(stored) => {
                *stored = record;
                Ok(())
            }
            None => Err(TesseraError::NotFound(format!(
                "No host with key {}",
                record.public_key
            ))),
        }
    }
}
