// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const BACKUPS_KEPT: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizerConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_score")]
    pub default_score: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub rules_path: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for HumanizerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            default_score: default_score(),
            seed: None,
            rules_path: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl HumanizerConfig {
    /// Seed to use for this run: `HUMANIZER_SEED` wins over the stored seed
    pub fn effective_seed(&self) -> Option<u64> {
        match std::env::var("HUMANIZER_SEED") {
            Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    warn!(value = %raw, "[CONFIG] Ignoring unparsable HUMANIZER_SEED");
                    self.seed
                }
            },
            _ => self.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub file_log: bool,
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_log: true,
            log_dir: None,
        }
    }
}

fn default_version() -> String { env!("CARGO_PKG_VERSION").to_string() }
fn default_score() -> f64 { 75.0 }
fn default_true() -> bool { true }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("humanizer"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir)?;
        Ok(())
    }

    /// Load configuration from file
    pub fn load(&self) -> Result<HumanizerConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(HumanizerConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load configuration, falling back to defaults when the file is unreadable
    pub fn load_or_default(&self) -> HumanizerConfig {
        self.load().unwrap_or_else(|e| {
            warn!(
                path = %self.config_file.display(),
                error = %e,
                "[CONFIG] Falling back to default config"
            );
            HumanizerConfig::default()
        })
    }

    /// Save configuration to file
    pub fn save(&self, config: &HumanizerConfig) -> Result<(), ConfigError> {
        self.ensure_dir()?;

        // Create backup if file exists
        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content)?;
        info!(path = %self.config_file.display(), "[CONFIG] Saved");
        Ok(())
    }

    /// Persist run defaults given on the command line; `None` leaves a value as stored
    pub fn remember_defaults(
        &self,
        score: Option<f64>,
        seed: Option<u64>,
        rules_path: Option<&str>,
    ) -> Result<HumanizerConfig, ConfigError> {
        let mut config = self.load()?;
        if let Some(score) = score {
            config.default_score = score;
        }
        if seed.is_some() {
            config.seed = seed;
        }
        if let Some(path) = rules_path {
            config.rules_path = Some(path.to_string());
        }
        self.save(&config)?;
        Ok(config)
    }

    /// Create a backup of current config
    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir)?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S_%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));
        fs::copy(&self.config_file, &backup_file)?;

        self.cleanup_old_backups(&backup_dir, BACKUPS_KEPT)
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Oldest first; names carry the timestamp, so they break mtime ties
        entries.sort_by_key(|e| {
            let modified = e
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
            (modified, e.file_name())
        });

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }
}
