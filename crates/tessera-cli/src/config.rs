// crates/tessera-cli/src/config.rs
//
// Runtime configuration for the tessera CLI.
// Loaded from a TOML file or populated with sensible defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use tessera_reputation::DecayConfig;

/// Runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TesseraConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Host interaction decay parameters.
    #[serde(default)]
    pub reputation: DecayConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TesseraConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            reputation: DecayConfig::default(),
        }
    }
}

impl TesseraConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// decay parameters are out of range.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: TesseraConfig = toml::from_str(&contents)?;
        config.reputation.validate()?;
        Ok(config)
    }
}

/// `~/.tessera/config.toml`, or `./config.toml` when no home directory is known.
pub fn default_config_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".tessera").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "log_level = \"debug\"\n\n[reputation]\ndecay_factor = 0.995\ndecay_limit = 250.0\nweight_limit = 0.05"
        )
        .unwrap();

        let config = TesseraConfig::load(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.reputation.decay_factor, 0.995);
        assert_eq!(config.reputation.decay_limit, 250.0);
        assert_eq!(config.reputation.weight_limit, 0.05);
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = TesseraConfig::load(file.path()).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.reputation, DecayConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_decay() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reputation]\ndecay_factor = 1.5").unwrap();
        assert!(TesseraConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(TesseraConfig::load(Path::new("/nonexistent/tessera.toml")).is_err());
    }

    #[test]
    fn test_default_path_file_name() {
        assert!(default_config_path().ends_with("config.toml"));
    }
}
