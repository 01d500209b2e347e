//! Cash and traded-volume bookkeeping.
//!
//! The harness reports fills one tick late, stamped with the tick they
//! happened in. Only fills stamped exactly `now - tick_interval` are applied;
//! anything else is a re-delivery or out of window and is skipped.
//!
//! Positions are not tracked here: the harness position is authoritative.
//! Counters exist for PnL observability and never feed into order sizing.

use quoter_core::{
    OrderSide, Price, Product, ProductMap, Quantity, Timestamp, Trade, TradingState,
};
use rust_decimal::Decimal;
use tracing::trace;

/// Running totals for a single product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductLedger {
    /// Realized cash: sells add `price * qty`, buys subtract it.
    pub cash: Decimal,
    /// Total quantity we traded.
    pub own_volume: Quantity,
    /// Total quantity traded by third parties.
    pub market_volume: Quantity,
    /// Number of own fills applied.
    pub fill_count: u64,
}

impl ProductLedger {
    /// Cash plus position marked at `mark`. `None` without a mark.
    pub fn mark_to_market(&self, position: Quantity, mark: Option<Price>) -> Option<Decimal> {
        mark.map(|mark| mark.notional(position) + self.cash)
    }
}

/// Fill bookkeeping across all products.
#[derive(Debug, Clone)]
pub struct Ledger {
    products: ProductMap<ProductLedger>,
    identity: String,
    tick_interval: Timestamp,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new(identity: impl Into<String>, tick_interval: Timestamp) -> Self {
        Self {
            products: ProductMap::default(),
            identity: identity.into(),
            tick_interval,
        }
    }

    /// Apply every fill from the previous tick for products booked this tick.
    ///
    /// Returns the number of fills applied.
    pub fn apply_tick(&mut self, state: &TradingState) -> usize {
        let expected = state.timestamp - self.tick_interval;
        let mut applied = 0;
        for product in Product::ALL {
            if state.depth(product).is_none() {
                continue;
            }
            for trade in state.trades_for(product) {
                if trade.timestamp != expected {
                    continue;
                }
                self.record_fill(product, trade);
                applied += 1;
            }
        }
        applied
    }

    /// Record a single fill, regardless of its timestamp.
    pub fn record_fill(&mut self, product: Product, trade: &Trade) {
        let entry = &mut self.products[product];
        let size = trade.quantity.abs();

        match trade.side_of(&self.identity) {
            Some(side) => {
                let value = trade.price.notional(size);
                entry.cash += match side {
                    OrderSide::Buy => -value,
                    OrderSide::Sell => value,
                };
                entry.own_volume += size;
                entry.fill_count += 1;
                trace!(%product, %side, price = %trade.price, size, "Own fill recorded");
            }
            None => {
                entry.market_volume += size;
            }
        }
    }

    /// Totals for a product.
    pub fn get(&self, product: Product) -> &ProductLedger {
        &self.products[product]
    }

    /// Realized cash summed over all products.
    pub fn total_cash(&self) -> Decimal {
        self.products.iter().map(|(_, l)| l.cash).sum()
    }

    /// Mark-to-market PnL summed over products that have a mark.
    pub fn total_pnl<F>(&self, mut position_and_mark: F) -> Decimal
    where
        F: FnMut(Product) -> (Quantity, Option<Price>),
    {
        self.products
            .iter()
            .filter_map(|(product, ledger)| {
                let (position, mark) = position_and_mark(product);
                ledger.mark_to_market(position, mark)
            })
            .sum()
    }

    /// Iterate over all product ledgers.
    pub fn iter(&self) -> impl Iterator<Item = (Product, &ProductLedger)> {
        self.products.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quoter_core::OrderDepth;
    use rust_decimal_macros::dec;

    const ME: &str = "SUBMISSION";

    fn fill(price: i64, qty: Quantity, buyer: &str, seller: &str, ts: Timestamp) -> Trade {
        Trade {
            symbol: Product::Bananas,
            price: Price::from(price),
            quantity: qty,
            buyer: buyer.to_string(),
            seller: seller.to_string(),
            timestamp: ts,
        }
    }

    fn state(ts: Timestamp, own: Vec<Trade>, market: Vec<Trade>) -> TradingState {
        let mut state = TradingState {
            timestamp: ts,
            ..Default::default()
        };
        state.order_depths.insert(Product::Bananas, OrderDepth::new());
        state.own_trades.insert(Product::Bananas, own);
        state.market_trades.insert(Product::Bananas, market);
        state
    }

    #[test]
    fn test_buy_reduces_cash() {
        let mut ledger = Ledger::new(ME, 100);
        ledger.record_fill(Product::Bananas, &fill(4950, 3, ME, "X", 0));
        let entry = ledger.get(Product::Bananas);
        assert_eq!(entry.cash, dec!(-14850));
        assert_eq!(entry.own_volume, 3);
        assert_eq!(entry.market_volume, 0);
        assert_eq!(entry.fill_count, 1);
    }

    #[test]
    fn test_sell_adds_cash() {
        let mut ledger = Ledger::new(ME, 100);
        ledger.record_fill(Product::Bananas, &fill(4952, 3, "X", ME, 0));
        assert_eq!(ledger.get(Product::Bananas).cash, dec!(14856));
    }

    #[test]
    fn test_round_trip_realizes_spread() {
        let mut ledger = Ledger::new(ME, 100);
        ledger.record_fill(Product::Bananas, &fill(4950, 2, ME, "X", 0));
        ledger.record_fill(Product::Bananas, &fill(4953, 2, "Y", ME, 100));
        let entry = ledger.get(Product::Bananas);
        assert_eq!(entry.cash, dec!(6));
        assert_eq!(entry.own_volume, 4);
        assert_eq!(entry.mark_to_market(0, Some(Price::from(4951))), Some(dec!(6)));
    }

    #[test]
    fn test_market_fill_only_counts_volume() {
        let mut ledger = Ledger::new(ME, 100);
        ledger.record_fill(Product::Bananas, &fill(4950, -4, "A", "B", 0));
        let entry = ledger.get(Product::Bananas);
        assert_eq!(entry.cash, Decimal::ZERO);
        assert_eq!(entry.market_volume, 4);
        assert_eq!(entry.own_volume, 0);
    }

    #[test]
    fn test_apply_tick_matches_previous_tick_exactly() {
        let mut ledger = Ledger::new(ME, 100);
        let tick = state(
            500,
            vec![
                fill(4950, 1, ME, "X", 400), // applied
                fill(4950, 5, ME, "X", 300), // stale
                fill(4950, 7, ME, "X", 500), // not yet due
            ],
            vec![fill(4951, 2, "A", "B", 400), fill(4951, 9, "A", "B", 200)],
        );
        assert_eq!(ledger.apply_tick(&tick), 2);
        let entry = ledger.get(Product::Bananas);
        assert_eq!(entry.own_volume, 1);
        assert_eq!(entry.cash, dec!(-4950));
        assert_eq!(entry.market_volume, 2);
    }

    #[test]
    fn test_apply_tick_skips_products_without_book() {
        let mut ledger = Ledger::new(ME, 100);
        let mut tick = state(500, vec![fill(4950, 1, ME, "X", 400)], vec![]);
        tick.order_depths.clear();
        assert_eq!(ledger.apply_tick(&tick), 0);
        assert_eq!(ledger.get(Product::Bananas), &ProductLedger::default());
    }

    #[test]
    fn test_mark_to_market() {
        let mut ledger = Ledger::new(ME, 100);
        ledger.record_fill(Product::Bananas, &fill(4950, 2, ME, "X", 0));
        let entry = ledger.get(Product::Bananas);
        // 2 * 4955 - 9900 = 10
        assert_eq!(entry.mark_to_market(2, Some(Price::from(4955))), Some(dec!(10)));
        assert_eq!(entry.mark_to_market(2, None), None);
    }

    #[test]
    fn test_totals_across_products() {
        let mut ledger = Ledger::new(ME, 100);
        ledger.record_fill(Product::Bananas, &fill(4950, 1, ME, "X", 0));
        ledger.record_fill(Product::Pearls, &fill(10002, 1, "X", ME, 0));
        assert_eq!(ledger.total_cash(), dec!(5052));

        let pnl = ledger.total_pnl(|p| match p {
            Product::Bananas => (1, Some(Price::from(4951))),
            Product::Pearls => (-1, Some(Price::from(10000))),
            _ => (0, None),
        });
        // (4951 - 4950) + (10002 - 10000) = 3
        assert_eq!(pnl, dec!(3));
    }
}
