//! Application configuration.

use std::path::Path;

use quoter_strategy::StrategyConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "QUOTER_CONFIG";

/// Config file used when neither the CLI nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Input handling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Log and skip lines that fail to decode instead of aborting the run.
    #[serde(default)]
    pub skip_malformed: bool,
}

/// Observability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Ticks between PnL summary log lines. 0 disables periodic summaries.
    #[serde(default = "default_summary_interval")]
    pub summary_interval: u64,

    /// Write the Prometheus text exposition here at shutdown.
    #[serde(default)]
    pub metrics_path: Option<String>,
}

fn default_summary_interval() -> u64 {
    1_000
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            summary_interval: default_summary_interval(),
            metrics_path: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub strategy: StrategyConfig,

    #[serde(default)]
    pub harness: HarnessConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Pick the config path: CLI arg > `QUOTER_CONFIG` > default path.
    pub fn resolve_path(cli: Option<String>) -> (String, bool) {
        match cli.or_else(|| std::env::var(CONFIG_ENV_VAR).ok()) {
            Some(path) => (path, true),
            None => (DEFAULT_CONFIG_PATH.to_string(), false),
        }
    }

    /// Load configuration.
    ///
    /// An explicitly named file must exist. A missing default file falls back
    /// to built-in defaults.
    pub fn load(cli: Option<String>) -> AppResult<Self> {
        let (path, explicit) = Self::resolve_path(cli);
        if explicit || Path::new(&path).exists() {
            Self::from_file(&path)
        } else {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parse from TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}
