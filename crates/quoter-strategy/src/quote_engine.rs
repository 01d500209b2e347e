//! Order generation for one product at one tick.
//!
//! Orders are built in a fixed sequence from remaining capacity:
//! - Crossing: take liquidity priced through fair value (anchored products only)
//! - Bid side: improve the best bid by one tick with most of the capacity,
//!   rest the remainder at the best bid, or join the bid, or stay out
//! - Ask side: mirror image of the bid side
//! - Bootstrap: with no touch price (or no fair value yet), rest the whole
//!   capacity at the far fallback price
//!
//! Capacity on each side is `limit -/+ position`, consumed as orders are
//! added, so the emitted buys (sells) can never push the position past the limit.

use quoter_core::{Order, OrderDepth, Price, Product, Quantity};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::config::{ProductConfig, StrategyConfig};

/// Market-side inputs for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteInputs {
    /// Current fair value, if known.
    pub fair: Option<Price>,
    /// Best bid and its resting size (positive).
    pub best_bid: Option<(Price, Quantity)>,
    /// Best ask and its resting size (negative).
    pub best_ask: Option<(Price, Quantity)>,
    /// Current position from the harness.
    pub position: Quantity,
}

impl QuoteInputs {
    /// Gather inputs from a book.
    pub fn from_depth(depth: &OrderDepth, fair: Option<Price>, position: Quantity) -> Self {
        Self {
            fair,
            best_bid: depth.best_bid(),
            best_ask: depth.best_ask(),
            position,
        }
    }
}

/// Static quoting parameters for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteParams {
    pub edge: Decimal,
    pub position_limit: Quantity,
    pub cross_mispriced: bool,
    pub tick_size: Decimal,
    pub bid_fallback_price: Price,
    pub ask_fallback_price: Price,
    pub aggressive_fraction: Decimal,
}

impl QuoteParams {
    pub fn new(config: &StrategyConfig, product: &ProductConfig) -> Self {
        Self {
            edge: product.edge,
            position_limit: product.position_limit,
            cross_mispriced: product.cross_mispriced,
            tick_size: config.tick_size,
            bid_fallback_price: config.bid_fallback_price,
            ask_fallback_price: config.ask_fallback_price,
            aggressive_fraction: config.aggressive_fraction,
        }
    }
}

/// Size of the order placed one tick inside the touch.
///
/// `max(floor(capacity * fraction), 1)` for positive capacity, 0 otherwise.
pub fn aggressive_clip(capacity: Quantity, fraction: Decimal) -> Quantity {
    if capacity <= 0 {
        return 0;
    }
    let scaled = (Decimal::from(capacity) * fraction).floor();
    scaled.to_i64().unwrap_or(0).clamp(1, capacity)
}

/// Compute this tick's orders for one product. Zero-quantity orders are dropped.
pub fn compute_orders(product: Product, inputs: &QuoteInputs, params: &QuoteParams) -> Vec<Order> {
    let mut orders = Vec::with_capacity(6);

    // A position already past the limit leaves no room on the side that worsens it.
    let mut buy_capacity = (params.position_limit - inputs.position).max(0);
    let mut sell_capacity = (params.position_limit + inputs.position).max(0);

    if params.cross_mispriced {
        if let Some(fair) = inputs.fair {
            if let Some((bid, bid_qty)) = inputs.best_bid {
                if bid > fair {
                    let size = bid_qty.min(sell_capacity);
                    orders.push(Order::new(product, bid, -size));
                    sell_capacity -= size;
                }
            }
            if let Some((ask, ask_qty)) = inputs.best_ask {
                if ask < fair {
                    let size = (-ask_qty).min(buy_capacity);
                    orders.push(Order::new(product, ask, size));
                    buy_capacity -= size;
                }
            }
        }
    }

    match (inputs.best_bid, inputs.fair) {
        (Some((bid, _)), Some(fair)) => {
            let threshold = fair - params.edge;
            let improved = bid + params.tick_size;
            if improved < threshold {
                if buy_capacity > 0 {
                    let clip = aggressive_clip(buy_capacity, params.aggressive_fraction);
                    orders.push(Order::new(product, improved, clip));
                    orders.push(Order::new(product, bid, buy_capacity - clip));
                }
            } else if bid < threshold {
                orders.push(Order::new(product, bid, buy_capacity));
            }
        }
        _ => orders.push(Order::new(product, params.bid_fallback_price, buy_capacity)),
    }

    match (inputs.best_ask, inputs.fair) {
        (Some((ask, _)), Some(fair)) => {
            let threshold = fair + params.edge;
            let improved = ask - params.tick_size;
            if improved > threshold {
                if sell_capacity > 0 {
                    let clip = aggressive_clip(sell_capacity, params.aggressive_fraction);
                    orders.push(Order::new(product, improved, -clip));
                    orders.push(Order::new(product, ask, -(sell_capacity - clip)));
                }
            } else if ask > threshold {
                orders.push(Order::new(product, ask, -sell_capacity));
            }
        }
        _ => orders.push(Order::new(product, params.ask_fallback_price, -sell_capacity)),
    }

    orders.retain(|order| order.quantity != 0);
    orders
}
