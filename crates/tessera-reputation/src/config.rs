// crates/tessera-reputation/src/config.rs
//
// Tuning constants for historic interaction decay.

use serde::{Deserialize, Serialize};

use tessera_core::error::TesseraError;

/// Decay parameters consumed by the reputation tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Multiplicative decay applied to historic counters per block, in (0, 1).
    #[serde(default = "default_decay_factor")]
    pub decay_factor: f64,

    /// Historic totals at or below this are not decayed, so a thin history
    /// is not eroded further.
    #[serde(default = "default_decay_limit")]
    pub decay_limit: f64,

    /// Maximum weight of one block's recent interactions relative to
    /// `max(decay_limit, historic total)`, in (0, 1].
    #[serde(default = "default_weight_limit")]
    pub weight_limit: f64,
}

fn default_decay_factor() -> f64 {
    0.9995
}

fn default_decay_limit() -> f64 {
    500.0
}

fn default_weight_limit() -> f64 {
    0.01
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            decay_factor: default_decay_factor(),
            decay_limit: default_decay_limit(),
            weight_limit: default_weight_limit(),
        }
    }
}

impl DecayConfig {
    /// Check that every parameter lies in its permitted range.
    ///
    /// # Errors
    /// Returns `TesseraError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<(), TesseraError> {
        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            return Err(TesseraError::InvalidConfig(format!(
                "decay_factor must be in (0, 1), got {}",
                self.decay_factor
            )));
        }
        if !(self.decay_limit > 0.0 && self.decay_limit.is_finite()) {
            return Err(TesseraError::InvalidConfig(format!(
                "decay_limit must be positive, got {}",
                self.decay_limit
            )));
        }
        if !(self.weight_limit > 0.0 && self.weight_limit <= 1.0) {
            return Err(TesseraError::InvalidConfig(format!(
                "weight_limit must be in (0, 1], got {}",
                self.weight_limit
            )));
        }
        Ok(())
    }
}
