//! Tick quoter harness.
//!
//! Wires the strategy to a JSON-lines tick stream:
//! - Configuration loading (TOML)
//! - Tick decoding and order encoding
//! - Metrics and periodic PnL summaries

pub mod app;
pub mod config;
pub mod error;

pub use app::{Application, RunSummary, TickOutput};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
