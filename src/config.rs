use crate::utils::get_config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an alternate config file
pub const CONFIG_ENV: &str = "NFTSYNC_CONFIG";

/// How the command stream is written to stdout
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// One `nft` command per line
    #[default]
    Text,
    /// A single nftables JSON batch for `nft -j -f -`
    Json,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Raises the level by `steps` (one per `-v`), saturating at `Trace`.
    pub fn raised(self, steps: u8) -> Self {
        let levels = [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ];
        let current = self as usize;
        levels[(current + usize::from(steps)).min(levels.len() - 1)]
    }

    pub const fn as_tracing(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Persistent defaults for the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub log_level: LogLevel,
    /// Append a JSON-lines record per run to the state directory (opt-in)
    #[serde(default)]
    pub audit_log: bool,
}

/// Location of the config file: `$NFTSYNC_CONFIG`, else the XDG config dir.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    get_config_dir().map(|dir| dir.join("config.json"))
}

/// Loads the config from `path`, or returns default if not found or invalid.
///
/// The config is read before the subscriber is installed, so an invalid file
/// is returned as a message for the caller to log.
pub fn load_config_from(path: &Path) -> (AppConfig, Option<String>) {
    match std::fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str::<AppConfig>(&json) {
            Ok(config) => (config, None),
            Err(e) => (
                AppConfig::default(),
                Some(format!("Ignoring invalid config {}: {e}", path.display())),
            ),
        },
        Err(_) => (AppConfig::default(), None),
    }
}
