// crates/tessera-reputation/src/tracker.rs
//
// ReputationTracker: records host interaction outcomes against an injected
// host directory.
//
// Each increment is a read-modify-write of one host record (select, decay,
// bump a recent counter, modify) performed under the tracker's exclusive
// lock, so concurrent callers never lose updates and increments for a given
// host apply in call order.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use tessera_core::error::TesseraError;
use tessera_core::host::{BlockHeight, HostPublicKey, HostRecord};
use tessera_core::traits::HostDirectory;

use crate::config::DecayConfig;
use crate::decay::update_historic_interactions;

/// Which recent counter an increment bumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interaction {
    Successful,
    Failed,
}

#[derive(Debug)]
struct TrackerState {
    /// Current consensus height, used as the decay reference point.
    block_height: BlockHeight,
    /// Whether the local node currently has working connectivity.
    online: bool,
}

/// Tracks successful and failed interactions with storage hosts.
pub struct ReputationTracker {
    directory: Arc<dyn HostDirectory>,
    config: DecayConfig,
    state: RwLock<TrackerState>,
}

impl ReputationTracker {
    /// Create a tracker at height 0 that considers itself online.
    ///
    /// # Errors
    /// Returns `TesseraError::InvalidConfig` if `config` fails validation.
    pub fn new(directory: Arc<dyn HostDirectory>, config: DecayConfig) -> Result<Self, TesseraError> {
        config.validate()?;
        Ok(Self {
            directory,
            config,
            state: RwLock::new(TrackerState {
                block_height: 0,
                online: true,
            }),
        })
    }

    pub fn config(&self) -> &DecayConfig {
        &self.config
    }

    /// The injected host directory.
    pub fn directory(&self) -> &Arc<dyn HostDirectory> {
        &self.directory
    }

    pub fn block_height(&self) -> BlockHeight {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .block_height
    }

    /// Record a new consensus height.
    pub fn set_block_height(&self, height: BlockHeight) -> Result<(), TesseraError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| TesseraError::Lock(format!("RwLock poisoned: {}", e)))?;
        state.block_height = height;
        Ok(())
    }

    pub fn is_online(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .online
    }

    /// Set the local connectivity signal. While offline, failures are not
    /// attributed to hosts.
    pub fn set_online(&self, online: bool) -> Result<(), TesseraError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| TesseraError::Lock(format!("RwLock poisoned: {}", e)))?;
        if state.online != online {
            debug!("Connectivity changed: online={}", online);
        }
        state.online = online;
        Ok(())
    }

    /// Record a successful interaction with the host `key`.
    ///
    /// Unknown hosts are ignored.
    pub fn increment_successful(&self, key: &HostPublicKey) -> Result<(), TesseraError> {
        self.increment(key, Interaction::Successful)
    }

    /// Record a failed interaction with the host `key`.
    ///
    /// Unknown hosts are ignored, and so is every failure while the local
    /// node is offline, since the host is then probably not at fault.
    pub fn increment_failed(&self, key: &HostPublicKey) -> Result<(), TesseraError> {
        self.increment(key, Interaction::Failed)
    }

    fn increment(&self, key: &HostPublicKey, interaction: Interaction) -> Result<(), TesseraError> {
        let state = self
            .state
            .write()
            .map_err(|e| TesseraError::Lock(format!("RwLock poisoned: {}", e)))?;

        let mut host = match self.directory.select(key)? {
            Some(host) => host,
            None => {
                debug!("Dropping {:?} interaction for unknown host {}", interaction, key);
                return Ok(());
            }
        };
        if interaction == Interaction::Failed && !state.online {
            debug!("Offline; not counting failed interaction against host {}", key);
            return Ok(());
        }

        update_historic_interactions(&mut host, state.block_height, &self.config);
        match interaction {
            Interaction::Successful => host.recent_successful += 1,
            Interaction::Failed => host.recent_failed += 1,
        }
        self.store(host)
    }

    /// Write a record back, treating a host removed in the meantime as a
    /// dropped update.
    fn store(&self, host: HostRecord) -> Result<(), TesseraError> {
        let key = host.public_key;
        match self.directory.modify(host) {
            Ok(()) => Ok(()),
            Err(TesseraError::NotFound(_)) => {
                debug!("Host {} left the directory before its update was stored", key);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
