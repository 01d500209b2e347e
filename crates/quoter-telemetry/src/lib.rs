//! Prometheus metrics and structured logging for the tick quoter.
//!
//! - Per-product gauges for fair value, smoothed mid, position, cash and PnL
//! - Counters for processed ticks, applied fills and emitted orders
//! - Structured logging with tracing (JSON in production, pretty otherwise)

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
