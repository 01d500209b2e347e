//! Prometheus metrics for the tick quoter.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A failure means duplicate metric
//! names, which is a programming error caught on first access at startup.

use once_cell::sync::Lazy;
use prometheus::{
    register_gauge_vec, register_int_counter, register_int_counter_vec, register_int_gauge_vec,
    Encoder, GaugeVec, IntCounter, IntCounterVec, IntGaugeVec, TextEncoder,
};
use quoter_core::{OrderSide, Product};

use crate::error::{TelemetryError, TelemetryResult};

/// Ticks processed.
pub static TICKS_PROCESSED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("quoter_ticks_processed_total", "Total ticks processed").unwrap()
});

/// Input lines that failed to decode.
pub static TICKS_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "quoter_ticks_rejected_total",
        "Total input lines rejected as malformed"
    )
    .unwrap()
});

/// Own and market fills applied from the previous tick's feeds.
pub static FILLS_APPLIED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "quoter_fills_applied_total",
        "Total own and market fills applied to the ledger"
    )
    .unwrap()
});

/// Orders emitted.
/// Labels: product, side (buy/sell)
pub static ORDERS_EMITTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "quoter_orders_emitted_total",
        "Total orders emitted",
        &["product", "side"]
    )
    .unwrap()
});

/// Current fair value.
pub static FAIR_VALUE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("quoter_fair_value", "Current fair value", &["product"]).unwrap()
});

/// Current smoothed mid.
pub static SMOOTHED_MID: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("quoter_smoothed_mid", "Exponentially smoothed mid", &["product"])
        .unwrap()
});

/// Harness-reported position.
pub static POSITION: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!("quoter_position", "Current position", &["product"]).unwrap()
});

/// Realized cash from own fills.
pub static CASH: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("quoter_cash", "Realized cash from own fills", &["product"]).unwrap()
});

/// Mark-to-market PnL estimate.
pub static PNL: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "quoter_pnl",
        "Position marked at smoothed mid plus cash",
        &["product"]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record a processed tick.
    pub fn tick_processed() {
        TICKS_PROCESSED_TOTAL.inc();
    }

    /// Record a malformed input line.
    pub fn tick_rejected() {
        TICKS_REJECTED_TOTAL.inc();
    }

    pub fn fills_applied(count: u64) {
        FILLS_APPLIED_TOTAL.inc_by(count);
    }

    /// Record an emitted order.
    pub fn order_emitted(product: Product, side: OrderSide) {
        let side = match side {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        };
        ORDERS_EMITTED_TOTAL
            .with_label_values(&[product.symbol(), side])
            .inc();
    }

    pub fn fair_value(product: Product, value: f64) {
        FAIR_VALUE.with_label_values(&[product.symbol()]).set(value);
    }

    pub fn smoothed_mid(product: Product, value: f64) {
        SMOOTHED_MID
            .with_label_values(&[product.symbol()])
            .set(value);
    }

    pub fn position(product: Product, position: i64) {
        POSITION.with_label_values(&[product.symbol()]).set(position);
    }

    pub fn cash(product: Product, cash: f64) {
        CASH.with_label_values(&[product.symbol()]).set(cash);
    }

    pub fn pnl(product: Product, pnl: f64) {
        PNL.with_label_values(&[product.symbol()]).set(pnl);
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn gather_text() -> TelemetryResult<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}
