// crates/tessera-cli/src/commands/simulate.rs
//
// `tessera simulate <scenario.json>`: replay host interactions and piece
// state changes through a ReputationTracker and a FileRegistry, then print
// the resulting host counters and file availability.
//
// Scenario format (JSON):
//   {
//     "start_height": 1000,
//     "hosts":  [{ "name": "alpha", "historic_successful": 100 }],
//     "files":  [{ "name": "a.txt", "pieces_required": 1, "total_pieces": 2,
//                  "pieces": [{ "contract": "c1", "host": "alpha",
//                               "piece_index": 0, "window_start": 2000 }] }],
//     "events": [{ "type": "height", "height": 1001 },
//                { "type": "success", "host": "alpha" },
//                { "type": "online", "online": false },
//                { "type": "piece_active", "file": "a.txt",
//                  "contract": "c1", "active": false }]
//   }

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::{Deserialize, Serialize};

use tessera_core::crypto::{hash_bytes, Hash};
use tessera_core::error::TesseraError;
use tessera_core::file::{ContractId, File, FileContract, FilePiece, NetAddress};
use tessera_core::host::{BlockHeight, HostPublicKey, HostRecord};
use tessera_core::traits::{HostDirectory, NullPersister};
use tessera_renter::{FileInfo, FileRegistry};
use tessera_reputation::{DecayConfig, InMemoryHostDirectory, ReputationTracker};

use crate::output::{format_json, format_table, FileRow, HostRow, OutputFormat};

/// Scenario replay command.
#[derive(Debug, Args)]
pub struct SimulateCmd {
    /// Path to the scenario JSON file.
    #[arg()]
    pub scenario: PathBuf,

    /// Print JSON instead of tables.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub start_height: BlockHeight,
    #[serde(default)]
    pub hosts: Vec<HostSpec>,
    #[serde(default)]
    pub files: Vec<FileSpec>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostSpec {
    pub name: String,
    /// Hex public key; derived from the name when omitted.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub historic_successful: u64,
    #[serde(default)]
    pub historic_failed: u64,
    #[serde(default)]
    pub recent_successful: u64,
    #[serde(default)]
    pub recent_failed: u64,
    #[serde(default)]
    pub last_historic_update: Option<BlockHeight>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileSpec {
    pub name: String,
    #[serde(default = "default_erasure_scheme")]
    pub erasure_scheme: String,
    pub pieces_required: usize,
    /// Defaults to `pieces_required`.
    #[serde(default)]
    pub optimal_recovery_pieces: Option<usize>,
    pub total_pieces: usize,
    #[serde(default)]
    pub pieces: Vec<PieceSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PieceSpec {
    /// Label the contract is referred to by in events.
    pub contract: String,
    pub host: String,
    pub piece_index: usize,
    pub window_start: BlockHeight,
    #[serde(default)]
    pub size: u64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub repairing: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Height { height: BlockHeight },
    Online { online: bool },
    Success { host: String },
    Failure { host: String },
    PieceActive { file: String, contract: String, active: bool },
    PieceRepairing { file: String, contract: String, repairing: bool },
}

fn default_erasure_scheme() -> String {
    "reed-solomon".to_string()
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct HostReport {
    pub name: String,
    pub record: HostRecord,
}

/// Final state after replaying a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub block_height: BlockHeight,
    pub online: bool,
    pub hosts: Vec<HostReport>,
    pub files: Vec<FileInfo>,
}

fn host_key(name: &str, spec: Option<&HostSpec>) -> Result<HostPublicKey, TesseraError> {
    match spec.and_then(|s| s.key.as_deref()) {
        Some(hex) => hex.parse(),
        None => Ok(HostPublicKey(hash_bytes(name.as_bytes()).0)),
    }
}

fn contract_id(label: &str) -> ContractId {
    ContractId(hash_bytes(label.as_bytes()).0)
}

/// Replay `scenario` and report the resulting state.
///
/// Events naming hosts absent from `hosts` reach the tracker under a derived
/// key the directory does not know, and are dropped there.
pub fn run_scenario(scenario: &Scenario, config: &DecayConfig) -> Result<SimulationReport, TesseraError> {
    let specs: HashMap<&str, &HostSpec> = scenario.hosts.iter().map(|h| (h.name.as_str(), h)).collect();
    let key_of = |name: &str| host_key(name, specs.get(name).copied());

    let directory = Arc::new(InMemoryHostDirectory::new());
    for spec in &scenario.hosts {
        directory.insert(HostRecord {
            public_key: key_of(spec.name.as_str())?,
            historic_successful: spec.historic_successful,
            historic_failed: spec.historic_failed,
            recent_successful: spec.recent_successful,
            recent_failed: spec.recent_failed,
            last_historic_update: spec.last_historic_update.unwrap_or(scenario.start_height),
        })?;
    }
    let tracker = ReputationTracker::new(directory.clone(), config.clone())?;
    tracker.set_block_height(scenario.start_height)?;

    let registry = FileRegistry::new(Arc::new(NullPersister));
    registry.set_block_height(scenario.start_height)?;
    for spec in &scenario.files {
        let optimal = spec.optimal_recovery_pieces.unwrap_or(spec.pieces_required);
        let mut file = File::new(
            spec.name.clone(),
            spec.erasure_scheme.clone(),
            spec.pieces_required,
            optimal,
            spec.total_pieces,
        )?;
        for piece in &spec.pieces {
            let address = specs
                .get(piece.host.as_str())
                .and_then(|h| h.address.clone())
                .unwrap_or_else(|| format!("{}:9982", piece.host));
            file.add_piece(FilePiece {
                active: piece.active,
                repairing: piece.repairing,
                contract: FileContract {
                    file_size: piece.size,
                    window_start: piece.window_start,
                    window_end: piece.window_start,
                    revision_number: 0,
                },
                contract_id: contract_id(&piece.contract),
                host_address: NetAddress(address),
                start_index: 0,
                end_index: piece.size,
                piece_index: piece.piece_index,
                checksum: Hash::default(),
            })?;
        }
        registry.add_file(file)?;
    }

    for event in &scenario.events {
        tracing::debug!("Applying {:?}", event);
        match event {
            Event::Height { height } => {
                tracker.set_block_height(*height)?;
                registry.set_block_height(*height)?;
            }
            Event::Online { online } => tracker.set_online(*online)?,
            Event::Success { host } => tracker.increment_successful(&key_of(host.as_str())?)?,
            Event::Failure { host } => tracker.increment_failed(&key_of(host.as_str())?)?,
            Event::PieceActive { file, contract, active } => {
                registry.set_piece_active(file, &contract_id(contract), *active)?
            }
            Event::PieceRepairing { file, contract, repairing } => {
                registry.set_piece_repairing(file, &contract_id(contract), *repairing)?
            }
        }
    }

    let mut hosts = Vec::with_capacity(scenario.hosts.len());
    for spec in &scenario.hosts {
        if let Some(record) = directory.select(&key_of(spec.name.as_str())?)? {
            hosts.push(HostReport {
                name: spec.name.clone(),
                record,
            });
        }
    }

    Ok(SimulationReport {
        block_height: tracker.block_height(),
        online: tracker.is_online(),
        hosts,
        files: registry.file_list()?,
    })
}

/// Run the simulate command.
pub fn run(cmd: &SimulateCmd, config: &DecayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(&cmd.scenario)?;
    let scenario: Scenario = serde_json::from_str(&contents)?;
    tracing::info!(
        "Replaying {} events over {} hosts and {} files",
        scenario.events.len(),
        scenario.hosts.len(),
        scenario.files.len()
    );

    let report = run_scenario(&scenario, config)?;

    match OutputFormat::from_json_flag(cmd.json) {
        OutputFormat::Json => println!("{}", format_json(&report)),
        OutputFormat::Table => {
            println!(
                "Block height: {}  Online: {}",
                report.block_height, report.online
            );
            let host_rows: Vec<HostRow> = report
                .hosts
                .iter()
                .map(|h| HostRow::new(h.name.clone(), &h.record))
                .collect();
            println!("{}", format_table(&host_rows));
            let file_rows: Vec<FileRow> = report.files.iter().map(FileRow::from).collect();
            println!("{}", format_table(&file_rows));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Scenario {
        serde_json::from_str(json).unwrap()
    }

    fn config() -> DecayConfig {
        DecayConfig {
            decay_factor: 0.995,
            decay_limit: 500.0,
            weight_limit: 0.01,
        }
    }

    #[test]
    fn test_replays_host_interactions() {
        let scenario = parse(
            r#"{
                "start_height": 1000,
                "hosts": [{ "name": "alpha", "historic_successful": 100, "recent_successful": 10 }],
                "events": [
                    { "type": "height", "height": 1001 },
                    { "type": "success", "host": "alpha" },
                    { "type": "failure", "host": "alpha" }
                ]
            }"#,
        );
        let report = run_scenario(&scenario, &config()).unwrap();
        assert_eq!(report.block_height, 1001);
        let record = &report.hosts[0].record;
        assert_eq!(record.historic_successful, 105);
        assert_eq!(record.recent_successful, 1);
        assert_eq!(record.recent_failed, 1);
        assert_eq!(record.last_historic_update, 1001);
    }

    #[test]
    fn test_offline_failures_and_unknown_hosts_are_dropped() {
        let scenario = parse(
            r#"{
                "hosts": [{ "name": "alpha" }],
                "events": [
                    { "type": "online", "online": false },
                    { "type": "failure", "host": "alpha" },
                    { "type": "success", "host": "ghost" }
                ]
            }"#,
        );
        let report = run_scenario(&scenario, &config()).unwrap();
        assert!(!report.online);
        assert_eq!(report.hosts.len(), 1);
        assert_eq!(report.hosts[0].record.recent_total(), 0);
    }

    #[test]
    fn test_replays_piece_events() {
        let scenario = parse(
            r#"{
                "start_height": 1800,
                "files": [{
                    "name": "a.txt", "pieces_required": 2, "total_pieces": 3,
                    "pieces": [
                        { "contract": "c0", "host": "alpha", "piece_index": 0, "window_start": 2000 },
                        { "contract": "c1", "host": "beta", "piece_index": 1, "window_start": 2000 }
                    ]
                }],
                "events": [
                    { "type": "piece_active", "file": "a.txt", "contract": "c1", "active": false },
                    { "type": "piece_repairing", "file": "a.txt", "contract": "c1", "repairing": true }
                ]
            }"#,
        );
        let report = run_scenario(&scenario, &config()).unwrap();
        let info = &report.files[0];
        assert!(!info.available);
        assert!(info.repairing);
        assert_eq!(info.time_remaining, 200);
        assert_eq!(info.active_pieces, 1);
    }

    #[test]
    fn test_unknown_contract_is_an_error() {
        let scenario = parse(
            r#"{
                "files": [{ "name": "a.txt", "pieces_required": 1, "total_pieces": 1 }],
                "events": [{ "type": "piece_active", "file": "a.txt", "contract": "zz", "active": true }]
            }"#,
        );
        assert!(matches!(
            run_scenario(&scenario, &config()),
            Err(TesseraError::NotFound(_))
        ));
    }

    #[test]
    fn test_explicit_host_key() {
        let key = HostPublicKey([0x5a; 32]);
        let scenario = parse(&format!(
            r#"{{ "hosts": [{{ "name": "alpha", "key": "{}" }}],
                  "events": [{{ "type": "success", "host": "alpha" }}] }}"#,
            key
        ));
        let report = run_scenario(&scenario, &config()).unwrap();
        assert_eq!(report.hosts[0].record.public_key, key);
        assert_eq!(report.hosts[0].record.recent_successful, 1);
    }
}
