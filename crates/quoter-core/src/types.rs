//! Per-tick input types: fills and the full trading state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::{OrderDepth, OrderSide, Price, Product, Quantity};

/// Harness timestamp. Advances by a fixed tick interval.
pub type Timestamp = i64;

/// An executed trade reported by the harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: Product,
    pub price: Price,
    pub quantity: Quantity,
    #[serde(default)]
    pub buyer: String,
    #[serde(default)]
    pub seller: String,
    pub timestamp: Timestamp,
}

impl Trade {
    /// Which side `identity` took in this trade, if any.
    ///
    /// A trade where both tags match is reported as a buy.
    pub fn side_of(&self, identity: &str) -> Option<OrderSide> {
        if self.buyer == identity {
            Some(OrderSide::Buy)
        } else if self.seller == identity {
            Some(OrderSide::Sell)
        } else {
            None
        }
    }
}

/// Everything the harness hands over for one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingState {
    pub timestamp: Timestamp,
    #[serde(default)]
    pub order_depths: HashMap<Product, OrderDepth>,
    #[serde(default)]
    pub own_trades: HashMap<Product, Vec<Trade>>,
    #[serde(default)]
    pub market_trades: HashMap<Product, Vec<Trade>>,
    #[serde(default)]
    pub position: HashMap<Product, Quantity>,
}

impl TradingState {
    /// Decode one tick from its JSON form. Unknown product symbols are rejected.
    pub fn from_json(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Book for `product`, if the harness supplied one this tick.
    pub fn depth(&self, product: Product) -> Option<&OrderDepth> {
        self.order_depths.get(&product)
    }

    /// Current position, zero when absent.
    pub fn position_of(&self, product: Product) -> Quantity {
        self.position.get(&product).copied().unwrap_or(0)
    }

    /// Own and market fills reported for `product`, own feed first.
    pub fn trades_for(&self, product: Product) -> impl Iterator<Item = &Trade> {
        self.own_trades
            .get(&product)
            .into_iter()
            .flatten()
            .chain(self.market_trades.get(&product).into_iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;

    fn trade(buyer: &str, seller: &str) -> Trade {
        Trade {
            symbol: Product::Pearls,
            price: Price::from(10000),
            quantity: 2,
            buyer: buyer.to_string(),
            seller: seller.to_string(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_side_of_identity() {
        assert_eq!(trade("SUBMISSION", "").side_of("SUBMISSION"), Some(OrderSide::Buy));
        assert_eq!(trade("", "SUBMISSION").side_of("SUBMISSION"), Some(OrderSide::Sell));
        assert_eq!(trade("A", "B").side_of("SUBMISSION"), None);
    }

    #[test]
    fn test_decode_tick() {
        let json = r#"{
            "timestamp": 200,
            "order_depths": {
                "PEARLS": {"buy_orders": {"9996": 2}, "sell_orders": {"10004": 2}}
            },
            "own_trades": {
                "PEARLS": [{"symbol": "PEARLS", "price": 9998, "quantity": 1,
                            "buyer": "SUBMISSION", "seller": "", "timestamp": 100}]
            },
            "position": {"PEARLS": 1}
        }"#;
        let state = TradingState::from_json(json).unwrap();
        assert_eq!(state.timestamp, 200);
        assert_eq!(state.position_of(Product::Pearls), 1);
        assert_eq!(state.position_of(Product::Bananas), 0);
        assert!(state.depth(Product::Pearls).is_some());
        assert!(state.depth(Product::Coconuts).is_none());
        assert_eq!(state.trades_for(Product::Pearls).count(), 1);
        assert_eq!(state.trades_for(Product::Bananas).count(), 0);
    }

    #[test]
    fn test_decode_rejects_unknown_product() {
        let json = r#"{"timestamp": 0, "order_depths": {"BERRIES": {}}}"#;
        let err = TradingState::from_json(json).unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
    }
}
