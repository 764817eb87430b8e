// crates/tessera-reputation/src/decay.rs
//
// Block-height decay of a host's historic interaction counters.
//
// Recent interactions were recorded at `last_historic_update` and never since.
// When `passed` blocks have elapsed, one block of decay is applied, the
// (clamped) recent interactions of that block are merged in, and then the
// remaining `passed - 1` blocks of decay are applied with no new activity.
// Collapsing this into a single `factor^passed` step gives different results
// whenever recent counters are non-zero.

use tessera_core::host::{BlockHeight, HostRecord};

use crate::config::DecayConfig;

/// Fold a host's recent interactions into its decayed history at `height`.
///
/// Must be called before every change to the recent counters. A no-op when
/// `height` is not past `last_historic_update`, so repeated calls at the same
/// height are idempotent and the update height never moves backwards.
pub fn update_historic_interactions(host: &mut HostRecord, height: BlockHeight, config: &DecayConfig) {
    if height <= host.last_historic_update {
        return;
    }
    let passed = height - host.last_historic_update;

    // Work in f64 for accuracy; truncate back to counters at the end.
    let mut hsi = host.historic_successful as f64;
    let mut hfi = host.historic_failed as f64;

    // Decay of a single block, only above the limit.
    if hsi + hfi > config.decay_limit {
        hsi *= config.decay_factor;
        hfi *= config.decay_factor;
    }

    // Recent interactions may weigh at most `weight_limit` of the history, or
    // of the decay limit while the history is still thin.
    let mut rsi = host.recent_successful as f64;
    let mut rfi = host.recent_failed as f64;
    let base = if hsi + hfi > config.decay_limit {
        hsi + hfi
    } else {
        config.decay_limit
    };
    let cap = config.weight_limit * base;
    if rsi + rfi > cap {
        let adjustment = cap / (rsi + rfi);
        rsi *= adjustment;
        rfi *= adjustment;
    }
    hsi += rsi;
    hfi += rfi;

    // Remaining blocks had no recent activity.
    if passed > 1 && hsi + hfi > config.decay_limit {
        let decay = config.decay_factor.powf((passed - 1) as f64);
        hsi *= decay;
        hfi *= decay;
    }

    host.historic_successful = hsi as u64;
    host.historic_failed = hfi as u64;
    host.recent_successful = 0;
    host.recent_failed = 0;
    host.last_historic_update = height;
}
