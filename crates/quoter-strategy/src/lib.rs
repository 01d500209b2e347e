//! Market making strategy for the tick quoter.
//!
//! Provides the per-tick decision pipeline:
//! - Fair value estimation (smoothed mids + linked-pair basis adjustment)
//! - Cash and traded-volume bookkeeping from delayed fill reports
//! - Order generation (crossing, aggressive/passive split, bootstrap quotes)
//!
//! # Architecture
//!
//! ```text
//! TradingState → Trader.run()
//!                 ├─ FairValueEstimator: smooth every mid, then derive fairs
//!                 ├─ Ledger: apply fills stamped one tick back
//!                 └─ compute_orders(): per-product order list
//!                      ↓
//!                 BTreeMap<Product, Vec<Order>> back to the harness
//! ```

pub mod config;
pub mod error;
pub mod fair_value;
pub mod ledger;
pub mod quote_engine;
pub mod trader;

pub use config::{FairValueModel, ProductConfig, StrategyConfig};
pub use error::{StrategyError, StrategyResult};
pub use fair_value::{FairValueEstimator, FairValueState};
pub use ledger::{Ledger, ProductLedger};
pub use quote_engine::{aggressive_clip, compute_orders, QuoteInputs, QuoteParams};
pub use trader::{ProductSnapshot, TickOrders, Trader};
