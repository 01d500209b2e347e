//! Order output types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Price, Product, Quantity};

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A limit order handed to the harness for one tick.
///
/// `quantity` is signed: positive buys, negative sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub symbol: Product,
    pub price: Price,
    pub quantity: Quantity,
}

impl Order {
    pub fn new(symbol: Product, price: Price, quantity: Quantity) -> Self {
        Self {
            symbol,
            price,
            quantity,
        }
    }

    /// Side implied by the quantity sign. `None` for a zero-quantity order.
    pub fn side(&self) -> Option<OrderSide> {
        match self.quantity.signum() {
            1 => Some(OrderSide::Buy),
            -1 => Some(OrderSide::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.symbol, self.price, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_from_sign() {
        let buy = Order::new(Product::Pearls, Price::from(9998), 3);
        let sell = Order::new(Product::Pearls, Price::from(10002), -3);
        let empty = Order::new(Product::Pearls, Price::from(10000), 0);
        assert_eq!(buy.side(), Some(OrderSide::Buy));
        assert_eq!(sell.side(), Some(OrderSide::Sell));
        assert_eq!(empty.side(), None);
    }

    #[test]
    fn test_order_display() {
        let order = Order::new(Product::Bananas, Price::from(4951), -7);
        assert_eq!(order.to_string(), "(BANANAS, 4951, -7)");
    }
}
