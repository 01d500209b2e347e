//! Order book snapshot and read-only top-of-book queries.
//!
//! Quantities are stored positive on both sides, as the harness reports them.
//! `best_ask` hands the resting size back negated, the strategy's convention
//! for "this much can be sold into us".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Price, Quantity};

/// Resting liquidity for one product at one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDepth {
    /// Bid price -> resting buy quantity.
    #[serde(default)]
    pub buy_orders: BTreeMap<Price, Quantity>,
    /// Ask price -> resting sell quantity.
    #[serde(default)]
    pub sell_orders: BTreeMap<Price, Quantity>,
}

impl OrderDepth {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper: add a resting bid level.
    pub fn with_bid(mut self, price: impl Into<Price>, quantity: Quantity) -> Self {
        self.buy_orders.insert(price.into(), quantity);
        self
    }

    /// Builder-style helper: add a resting ask level.
    pub fn with_ask(mut self, price: impl Into<Price>, quantity: Quantity) -> Self {
        self.sell_orders.insert(price.into(), quantity);
        self
    }

    /// Highest bid and its resting size.
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.buy_orders
            .iter()
            .next_back()
            .map(|(price, qty)| (*price, *qty))
    }

    /// Lowest ask and its resting size, negated.
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.sell_orders
            .iter()
            .next()
            .map(|(price, qty)| (*price, -*qty))
    }

    /// Average of best bid and best ask. Requires both sides.
    pub fn mid_price(&self) -> Option<Price> {
        let (bid, _) = self.best_bid()?;
        let (ask, _) = self.best_ask()?;
        Some(Price::midpoint(bid, ask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn book() -> OrderDepth {
        OrderDepth::new()
            .with_bid(9995, 20)
            .with_bid(9996, 2)
            .with_ask(10004, 2)
            .with_ask(10005, 20)
    }

    #[test]
    fn test_best_bid_is_max_price() {
        assert_eq!(book().best_bid(), Some((Price::from(9996), 2)));
    }

    #[test]
    fn test_best_ask_is_min_price_and_negative() {
        assert_eq!(book().best_ask(), Some((Price::from(10004), -2)));
    }

    #[test]
    fn test_mid_price() {
        assert_eq!(book().mid_price(), Some(Price::new(dec!(10000))));
        let odd = OrderDepth::new().with_bid(4950, 1).with_ask(4953, 1);
        assert_eq!(odd.mid_price(), Some(Price::new(dec!(4951.5))));
    }

    #[test]
    fn test_one_sided_book_has_no_mid() {
        let bids_only = OrderDepth::new().with_bid(9996, 2);
        assert!(bids_only.best_ask().is_none());
        assert!(bids_only.mid_price().is_none());

        let asks_only = OrderDepth::new().with_ask(10004, 2);
        assert!(asks_only.best_bid().is_none());
        assert!(asks_only.mid_price().is_none());

        assert!(OrderDepth::new().mid_price().is_none());
    }

    #[test]
    fn test_decode_from_json_with_string_keys() {
        let json = r#"{"buy_orders": {"9996": 2, "9995": 20}, "sell_orders": {"10004": 2}}"#;
        let depth: OrderDepth = serde_json::from_str(json).unwrap();
        assert_eq!(depth.best_bid(), Some((Price::from(9996), 2)));
        assert_eq!(depth.best_ask(), Some((Price::from(10004), -2)));
    }
}
