// crates/tessera-core/src/host.rs
//
// Host identity and the interaction counters the reputation tracker decays.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TesseraError;

/// Discrete time unit: one tick per consensus block.
pub type BlockHeight = u64;

/// Public key of a storage host (ed25519). Unique key in the host directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostPublicKey(pub [u8; 32]);

impl fmt::Display for HostPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ed25519:{}", hex::encode(self.0))
    }
}

impl FromStr for HostPublicKey {
    type Err = TesseraError;

    /// Parse a hex key, with or without the `ed25519:` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("ed25519:").unwrap_or(s);
        let bytes = hex::decode(raw)
            .map_err(|e| TesseraError::Serialization(format!("Invalid host key hex: {}", e)))?;
        let key: [u8; 32] = bytes.try_into().map_err(|_| {
            TesseraError::Serialization("Host key must be exactly 32 bytes".to_string())
        })?;
        Ok(HostPublicKey(key))
    }
}

/// A host as known to the host directory, carrying its interaction history.
///
/// Historic counters are the long-run, decayed history; recent counters
/// accumulate since `last_historic_update` and are folded into the historic
/// ones the next time decay is applied at a later height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    pub public_key: HostPublicKey,
    pub historic_successful: u64,
    pub historic_failed: u64,
    pub recent_successful: u64,
    pub recent_failed: u64,
    /// Block height at which decay was last applied.
    pub last_historic_update: BlockHeight,
}

impl HostRecord {
    /// A freshly observed host with no interaction history.
    pub fn new(public_key: HostPublicKey, first_seen: BlockHeight) -> Self {
        Self {
            public_key,
            historic_successful: 0,
            historic_failed: 0,
            recent_successful: 0,
            recent_failed: 0,
            last_historic_update: first_seen,
        }
    }

    pub fn historic_total(&self) -> u64 {
        self.historic_successful + self.historic_failed
    }

    pub fn recent_total(&self) -> u64 {
        self.recent_successful + self.recent_failed
    }
}
