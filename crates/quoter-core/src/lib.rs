//! Core domain types for the tick quoter.
//!
//! This crate provides the fundamental types shared by the strategy and the harness:
//! - `Product`, `ProductMap`: The closed instrument set and dense per-product storage
//! - `Price`, `Quantity`: Precision-safe price and signed quantity types
//! - `OrderDepth`: One tick of resting book liquidity with best bid/ask/mid queries
//! - `Trade`, `TradingState`: Fill feeds and the full per-tick input
//! - `Order`, `OrderSide`: Strategy output

pub mod book;
pub mod decimal;
pub mod error;
pub mod order;
pub mod product;
pub mod types;

pub use book::OrderDepth;
pub use decimal::{Price, Quantity};
pub use error::{CoreError, Result};
pub use order::{Order, OrderSide};
pub use product::{Product, ProductMap};
pub use types::{Timestamp, Trade, TradingState};
