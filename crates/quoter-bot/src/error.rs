//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Strategy error: {0}")]
    Strategy(#[from] quoter_strategy::StrategyError),

    #[error("Malformed tick on line {line}: {source}")]
    MalformedTick {
        line: u64,
        #[source]
        source: quoter_core::CoreError,
    },

    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] quoter_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
