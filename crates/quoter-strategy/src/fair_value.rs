//! Fair value estimation.
//!
//! Each tick runs in two phases that must not be interleaved:
//!
//! 1. every product's smoothed mid absorbs this tick's mid (EWMA),
//! 2. fair values are derived; linked products read their counterpart's
//!    smoothed mid as updated in phase 1 of the *same* tick.
//!
//! [`FairValueEstimator::update`] is the only entry point that mutates state,
//! so callers cannot run phase 2 against stale counterpart averages.

use quoter_core::{OrderDepth, Price, Product, ProductMap};
use rust_decimal::Decimal;
use tracing::trace;

use crate::config::{FairValueModel, ProductConfig};

/// Per-product estimator state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FairValueState {
    /// Exponentially smoothed mid. Once set, never cleared.
    pub smoothed_mid: Option<Price>,
    /// Current fair value.
    pub fair: Option<Price>,
}

/// Smoothed-mid and fair value tracker for all products.
#[derive(Debug, Clone)]
pub struct FairValueEstimator {
    states: ProductMap<FairValueState>,
    decay: ProductMap<Decimal>,
    models: ProductMap<FairValueModel>,
}

impl FairValueEstimator {
    /// Create an estimator. Seeded products start with smoothed mid and fair
    /// value at their seed; all others start empty.
    pub fn new(params: &ProductMap<ProductConfig>) -> Self {
        Self {
            states: ProductMap::from_fn(|p| FairValueState {
                smoothed_mid: params[p].seed_price,
                fair: params[p].seed_price,
            }),
            decay: ProductMap::from_fn(|p| params[p].decay),
            models: ProductMap::from_fn(|p| params[p].fair_value.clone()),
        }
    }

    /// Run both phases for one tick.
    ///
    /// `books[p]` is `None` when the harness sent no book for `p` this tick;
    /// such products keep their state untouched.
    pub fn update(&mut self, books: &ProductMap<Option<&OrderDepth>>) {
        let mids = ProductMap::from_fn(|p| books[p].and_then(OrderDepth::mid_price));

        // Phase 1
        for (product, state) in self.states.iter_mut() {
            if let Some(mid) = mids[product] {
                state.smoothed_mid = Some(ewma(state.smoothed_mid, mid, self.decay[product]));
            }
        }

        // Phase 2
        for product in Product::ALL {
            if books[product].is_none() {
                continue;
            }
            let fair = match &self.models[product] {
                FairValueModel::Independent => self.states[product].smoothed_mid,
                FairValueModel::Linked {
                    counterpart,
                    weight,
                } => {
                    let own = self.states[product].smoothed_mid;
                    let counter_smoothed = self.states[*counterpart].smoothed_mid;
                    match (own, mids[*counterpart], counter_smoothed) {
                        (Some(own), Some(counter_mid), Some(counter_smoothed)) => {
                            linked_fair(own, counter_mid, counter_smoothed, *weight)
                                .or(self.states[product].fair)
                        }
                        _ => self.states[product].fair,
                    }
                }
            };
            trace!(
                %product,
                fair = ?fair,
                smoothed = ?self.states[product].smoothed_mid,
                "Fair value updated"
            );
            self.states[product].fair = fair;
        }
    }

    /// Current smoothed mid.
    pub fn smoothed_mid(&self, product: Product) -> Option<Price> {
        self.states[product].smoothed_mid
    }

    /// Current fair value.
    pub fn fair(&self, product: Product) -> Option<Price> {
        self.states[product].fair
    }

    /// Full state for a product.
    pub fn state(&self, product: Product) -> FairValueState {
        self.states[product]
    }
}

/// One EWMA step. The first observation is taken as-is.
pub fn ewma(prev: Option<Price>, mid: Price, decay: Decimal) -> Price {
    match prev {
        None => mid,
        Some(prev) => prev * decay + mid.inner() * (Decimal::ONE - decay),
    }
}

/// Basis-adjusted fair value for a linked product.
///
/// `None` when the counterpart's smoothed mid is zero.
pub fn linked_fair(
    own_smoothed: Price,
    counter_mid: Price,
    counter_smoothed: Price,
    weight: Decimal,
) -> Option<Price> {
    let deviation = counter_mid.ratio_to(counter_smoothed)? - Decimal::ONE;
    Some(own_smoothed * (Decimal::ONE + weight * deviation))
}
