// crates/tessera-cli/src/commands/decay.rs
//
// `tessera decay`: apply one decay step to a host's counters and print the
// result. Useful for checking how a config change treats a given history.

use clap::Args;

use tessera_core::host::{HostPublicKey, HostRecord};
use tessera_reputation::{update_historic_interactions, DecayConfig};

use crate::output::{format_json, format_table, HostRow, OutputFormat};

/// Decay inspection command.
#[derive(Debug, Args)]
pub struct DecayCmd {
    #[arg(long, default_value = "0")]
    pub historic_successful: u64,

    #[arg(long, default_value = "0")]
    pub historic_failed: u64,

    #[arg(long, default_value = "0")]
    pub recent_successful: u64,

    #[arg(long, default_value = "0")]
    pub recent_failed: u64,

    /// Height at which decay was last applied.
    #[arg(long, default_value = "0")]
    pub last_update: u64,

    /// Height to decay to.
    #[arg(long)]
    pub height: u64,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl DecayCmd {
    fn record(&self) -> HostRecord {
        HostRecord {
            public_key: HostPublicKey([0u8; 32]),
            historic_successful: self.historic_successful,
            historic_failed: self.historic_failed,
            recent_successful: self.recent_successful,
            recent_failed: self.recent_failed,
            last_historic_update: self.last_update,
        }
    }
}

/// Run the decay command.
pub fn run(cmd: &DecayCmd, config: &DecayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let before = cmd.record();
    let mut after = before.clone();
    update_historic_interactions(&mut after, cmd.height, config);
    tracing::debug!(
        "Decayed from height {} to {} with {:?}",
        cmd.last_update,
        cmd.height,
        config
    );

    match OutputFormat::from_json_flag(cmd.json) {
        OutputFormat::Json => println!(
            "{}",
            format_json(&serde_json::json!({ "before": before, "after": after }))
        ),
        OutputFormat::Table => println!(
            "{}",
            format_table(&[HostRow::new("before", &before), HostRow::new("after", &after)])
        ),
    }
    Ok(())
}
