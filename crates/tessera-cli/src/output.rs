// crates/tessera-cli/src/output.rs
//
// Output formatting utilities for the tessera CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

use tessera_core::host::HostRecord;
use tessera_renter::FileInfo;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

/// Table row for a host record.
#[derive(Debug, Tabled)]
pub struct HostRow {
    #[tabled(rename = "Host")]
    pub host: String,
    #[tabled(rename = "Hist OK")]
    pub historic_successful: u64,
    #[tabled(rename = "Hist Fail")]
    pub historic_failed: u64,
    #[tabled(rename = "Recent OK")]
    pub recent_successful: u64,
    #[tabled(rename = "Recent Fail")]
    pub recent_failed: u64,
    #[tabled(rename = "Last Update")]
    pub last_historic_update: u64,
}

impl HostRow {
    pub fn new(label: impl Into<String>, record: &HostRecord) -> Self {
        Self {
            host: label.into(),
            historic_successful: record.historic_successful,
            historic_failed: record.historic_failed,
            recent_successful: record.recent_successful,
            recent_failed: record.recent_failed,
            last_historic_update: record.last_historic_update,
        }
    }
}

/// Table row for a file summary.
#[derive(Debug, Tabled)]
pub struct FileRow {
    #[tabled(rename = "File")]
    pub name: String,
    #[tabled(rename = "Available")]
    pub available: bool,
    #[tabled(rename = "Repairing")]
    pub repairing: bool,
    #[tabled(rename = "Pieces")]
    pub pieces: String,
    #[tabled(rename = "Blocks Left")]
    pub time_remaining: u64,
}

impl From<&FileInfo> for FileRow {
    fn from(info: &FileInfo) -> Self {
        Self {
            name: info.name.clone(),
            available: info.available,
            repairing: info.repairing,
            pieces: format!(
                "{}/{} (need {})",
                info.active_pieces, info.total_pieces, info.pieces_required
            ),
            time_remaining: info.time_remaining,
        }
    }
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}
