//! Per-tick driver.
//!
//! Owns all cross-tick state and runs the pipeline in order:
//! fair values (both estimator phases), then fill bookkeeping, then quoting.

use std::collections::BTreeMap;

use quoter_core::{Order, OrderDepth, Price, Product, ProductMap, Quantity, TradingState};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{ProductConfig, StrategyConfig};
use crate::error::StrategyResult;
use crate::fair_value::FairValueEstimator;
use crate::ledger::Ledger;
use crate::quote_engine::{compute_orders, QuoteInputs, QuoteParams};

/// Orders for one tick, keyed by product. Only products with a book appear.
pub type TickOrders = BTreeMap<Product, Vec<Order>>;

/// Diagnostic view of one product after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub product: Product,
    pub smoothed_mid: Option<Price>,
    pub fair: Option<Price>,
    pub position: Quantity,
    pub cash: Decimal,
    pub own_volume: Quantity,
    pub market_volume: Quantity,
    /// `position * smoothed_mid + cash`, when the smoothed mid is known.
    pub pnl: Option<Decimal>,
}

/// Market making strategy state carried across ticks.
#[derive(Debug, Clone)]
pub struct Trader {
    params: ProductMap<ProductConfig>,
    quote_params: ProductMap<QuoteParams>,
    estimator: FairValueEstimator,
    ledger: Ledger,
    last_fills: usize,
}

impl Trader {
    /// Validate the config and build a fresh trader.
    pub fn new(config: StrategyConfig) -> StrategyResult<Self> {
        let params = config.resolve()?;
        let quote_params = ProductMap::from_fn(|p| QuoteParams::new(&config, &params[p]));
        let estimator = FairValueEstimator::new(&params);
        let ledger = Ledger::new(config.identity, config.tick_interval);

        Ok(Self {
            params,
            quote_params,
            estimator,
            ledger,
            last_fills: 0,
        })
    }

    /// Process one tick and return the orders to submit.
    pub fn run(&mut self, state: &TradingState) -> TickOrders {
        let books: ProductMap<Option<&OrderDepth>> = ProductMap::from_fn(|p| state.depth(p));

        self.estimator.update(&books);
        let fills = self.ledger.apply_tick(state);
        self.last_fills = fills;
        if fills > 0 {
            debug!(timestamp = state.timestamp, fills, "Applied fills from previous tick");
        }

        let mut result = TickOrders::new();
        for product in Product::ALL {
            let Some(depth) = books[product] else {
                continue;
            };
            let inputs = QuoteInputs::from_depth(
                depth,
                self.estimator.fair(product),
                state.position_of(product),
            );
            let limit = self.params[product].position_limit;
            debug!(
                %product,
                best_bid = ?inputs.best_bid.map(|(p, _)| p),
                fair = ?inputs.fair,
                best_ask = ?inputs.best_ask.map(|(p, _)| p),
                position = inputs.position,
                buy_capacity = (limit - inputs.position).max(0),
                sell_capacity = (limit + inputs.position).max(0),
                "Fair info"
            );

            let orders = compute_orders(product, &inputs, &self.quote_params[product]);
            for order in &orders {
                debug!(%order, "Order");
            }
            result.insert(product, orders);
        }
        result
    }

    /// Per-product diagnostics using the harness positions in `state`.
    pub fn snapshot(&self, state: &TradingState) -> Vec<ProductSnapshot> {
        Product::ALL
            .into_iter()
            .map(|product| {
                let position = state.position_of(product);
                let smoothed_mid = self.estimator.smoothed_mid(product);
                let ledger = self.ledger.get(product);
                ProductSnapshot {
                    product,
                    smoothed_mid,
                    fair: self.estimator.fair(product),
                    position,
                    cash: ledger.cash,
                    own_volume: ledger.own_volume,
                    market_volume: ledger.market_volume,
                    pnl: ledger.mark_to_market(position, smoothed_mid),
                }
            })
            .collect()
    }

    /// Total mark-to-market PnL over products with a known smoothed mid.
    pub fn total_pnl(&self, state: &TradingState) -> Decimal {
        self.ledger.total_pnl(|product| {
            (state.position_of(product), self.estimator.smoothed_mid(product))
        })
    }

    /// Own and market fills applied by the most recent `run`.
    pub fn last_fills(&self) -> usize {
        self.last_fills
    }

    pub fn estimator(&self) -> &FairValueEstimator {
        &self.estimator
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Resolved parameters for a product.
    pub fn params(&self, product: Product) -> &ProductConfig {
        &self.params[product]
    }
}
