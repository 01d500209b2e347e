//! Strategy configuration.
//!
//! Per-product parameters are keyed by exchange symbol in TOML and resolved
//! into a dense `ProductMap` by [`StrategyConfig::resolve`]. Resolution is the
//! only place a config can fail: every product must be present, every symbol
//! must be known, and every numeric parameter must be in range.

use std::collections::BTreeMap;

use quoter_core::{Price, Product, ProductMap, Quantity, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{StrategyError, StrategyResult};

/// How a product's fair value is derived from smoothed mids.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum FairValueModel {
    /// Fair value is the product's own smoothed mid.
    #[default]
    Independent,
    /// Fair value is the own smoothed mid, tilted by the counterpart's live
    /// deviation from its smoothed mid:
    /// `m(self) * (1 + weight * (mid(counterpart) / m(counterpart) - 1))`.
    Linked { counterpart: Product, weight: Decimal },
}

/// Parameters for a single product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductConfig {
    /// Minimum distance from fair value before quoting passively.
    pub edge: Decimal,

    /// Symmetric position limit: positions stay within `[-limit, limit]`.
    pub position_limit: Quantity,

    /// Smoothing decay for the mid EWMA, in (0, 1). Larger = slower.
    pub decay: Decimal,

    /// Starting smoothed mid and fair value. Absent = wait for the first mid.
    #[serde(default)]
    pub seed_price: Option<Price>,

    /// Take resting liquidity on the wrong side of fair value.
    /// Only meaningful for products anchored to a stable level.
    #[serde(default)]
    pub cross_mispriced: bool,

    #[serde(default)]
    pub fair_value: FairValueModel,
}

/// Strategy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Counterparty tag identifying our own fills.
    #[serde(default = "default_identity")]
    pub identity: String,

    /// Harness timestamp step between ticks. Fills are reported one step late.
    #[serde(default = "default_tick_interval")]
    pub tick_interval: Timestamp,

    /// Price increment used when improving on the best bid/ask.
    #[serde(default = "default_tick_size")]
    pub tick_size: Decimal,

    /// Bootstrap bid price when there is no bid (or no fair value).
    #[serde(default = "default_bid_fallback_price")]
    pub bid_fallback_price: Price,

    /// Bootstrap ask price when there is no ask (or no fair value).
    #[serde(default = "default_ask_fallback_price")]
    pub ask_fallback_price: Price,

    /// Share of remaining capacity sent one tick inside the touch.
    /// The rest rests at the touch.
    #[serde(default = "default_aggressive_fraction")]
    pub aggressive_fraction: Decimal,

    /// Per-product parameters keyed by symbol.
    #[serde(default = "default_products")]
    pub products: BTreeMap<String, ProductConfig>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            identity: default_identity(),
            tick_interval: default_tick_interval(),
            tick_size: default_tick_size(),
            bid_fallback_price: default_bid_fallback_price(),
            ask_fallback_price: default_ask_fallback_price(),
            aggressive_fraction: default_aggressive_fraction(),
            products: default_products(),
        }
    }
}

impl StrategyConfig {
    /// Validate the config and lay product parameters out densely.
    pub fn resolve(&self) -> StrategyResult<ProductMap<ProductConfig>> {
        if self.identity.is_empty() {
            return Err(invalid("identity must not be empty"));
        }
        if self.tick_interval <= 0 {
            return Err(invalid(format!(
                "tick_interval must be positive, got {}",
                self.tick_interval
            )));
        }
        if self.tick_size <= Decimal::ZERO {
            return Err(invalid(format!(
                "tick_size must be positive, got {}",
                self.tick_size
            )));
        }
        if self.aggressive_fraction <= Decimal::ZERO || self.aggressive_fraction > Decimal::ONE {
            return Err(invalid(format!(
                "aggressive_fraction must be in (0, 1], got {}",
                self.aggressive_fraction
            )));
        }
        if self.bid_fallback_price >= self.ask_fallback_price {
            return Err(invalid(format!(
                "bid_fallback_price ({}) must be below ask_fallback_price ({})",
                self.bid_fallback_price, self.ask_fallback_price
            )));
        }

        for symbol in self.products.keys() {
            symbol.parse::<Product>()?;
        }

        ProductMap::try_from_fn(|product| -> StrategyResult<ProductConfig> {
            let params = self
                .products
                .get(product.symbol())
                .ok_or_else(|| invalid(format!("missing parameters for {product}")))?;
            validate_product(product, params)?;
            Ok(params.clone())
        })
    }
}

fn validate_product(product: Product, params: &ProductConfig) -> StrategyResult<()> {
    if params.edge < Decimal::ZERO {
        return Err(invalid(format!("{product}: edge must be >= 0")));
    }
    if params.position_limit <= 0 {
        return Err(invalid(format!("{product}: position_limit must be positive")));
    }
    if params.decay <= Decimal::ZERO || params.decay >= Decimal::ONE {
        return Err(invalid(format!(
            "{product}: decay must be in (0, 1), got {}",
            params.decay
        )));
    }
    if let FairValueModel::Linked { counterpart, .. } = params.fair_value {
        if counterpart == product {
            return Err(invalid(format!("{product}: cannot be linked to itself")));
        }
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> StrategyError {
    StrategyError::InvalidConfig(msg.into())
}

fn default_identity() -> String {
    "SUBMISSION".to_string()
}
fn default_tick_interval() -> Timestamp {
    100
}
fn default_tick_size() -> Decimal {
    Decimal::ONE
}
fn default_bid_fallback_price() -> Price {
    Price::from(1)
}
fn default_ask_fallback_price() -> Price {
    Price::from(99_999)
}
fn default_aggressive_fraction() -> Decimal {
    Decimal::new(9, 1) // 0.9
}

fn default_products() -> BTreeMap<String, ProductConfig> {
    let mut products = BTreeMap::new();
    products.insert(
        Product::Pearls.symbol().to_string(),
        ProductConfig {
            edge: Decimal::new(5, 1), // 0.5
            position_limit: 20,
            decay: Decimal::new(99, 2), // 0.99
            seed_price: Some(Price::from(10_000)),
            cross_mispriced: true,
            fair_value: FairValueModel::Independent,
        },
    );
    products.insert(
        Product::Bananas.symbol().to_string(),
        ProductConfig {
            edge: Decimal::ONE,
            position_limit: 20,
            decay: Decimal::new(9, 1), // 0.9
            seed_price: None,
            cross_mispriced: true,
            fair_value: FairValueModel::Independent,
        },
    );
    products.insert(
        Product::Coconuts.symbol().to_string(),
        ProductConfig {
            edge: Decimal::ONE,
            position_limit: 600,
            decay: Decimal::new(9, 1),
            seed_price: None,
            cross_mispriced: false,
            fair_value: FairValueModel::Linked {
                counterpart: Product::PinaColadas,
                weight: Decimal::new(5, 1), // 0.5
            },
        },
    );
    products.insert(
        Product::PinaColadas.symbol().to_string(),
        ProductConfig {
            edge: Decimal::ONE,
            position_limit: 300,
            decay: Decimal::new(9, 1),
            seed_price: None,
            cross_mispriced: false,
            fair_value: FairValueModel::Linked {
                counterpart: Product::Coconuts,
                weight: Decimal::new(8, 1), // 0.8
            },
        },
    );
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = StrategyConfig::default();
        assert_eq!(config.identity, "SUBMISSION");
        assert_eq!(config.tick_interval, 100);
        assert_eq!(config.tick_size, dec!(1));
        assert_eq!(config.bid_fallback_price, Price::from(1));
        assert_eq!(config.ask_fallback_price, Price::from(99999));
        assert_eq!(config.aggressive_fraction, dec!(0.9));

        let params = config.resolve().unwrap();
        assert_eq!(params[Product::Pearls].edge, dec!(0.5));
        assert_eq!(params[Product::Pearls].decay, dec!(0.99));
        assert_eq!(params[Product::Pearls].seed_price, Some(Price::from(10000)));
        assert!(params[Product::Pearls].cross_mispriced);
        assert!(params[Product::Bananas].cross_mispriced);
        assert_eq!(params[Product::Coconuts].position_limit, 600);
        assert_eq!(params[Product::PinaColadas].position_limit, 300);
        assert!(!params[Product::Coconuts].cross_mispriced);
        assert_eq!(
            params[Product::Coconuts].fair_value,
            FairValueModel::Linked {
                counterpart: Product::PinaColadas,
                weight: dec!(0.5)
            }
        );
        assert_eq!(
            params[Product::PinaColadas].fair_value,
            FairValueModel::Linked {
                counterpart: Product::Coconuts,
                weight: dec!(0.8)
            }
        );
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: StrategyConfig = toml::from_str("identity = \"ME\"").unwrap();
        assert_eq!(config.identity, "ME");
        assert_eq!(config.tick_interval, 100);
        assert_eq!(config.products.len(), Product::COUNT);
        assert!(config.resolve().is_ok());
    }

    fn full_products_toml(extra: &str) -> String {
        format!(
            r#"
[products.PEARLS]
edge = 0.5
position_limit = 20
decay = 0.99
seed_price = 10000
cross_mispriced = true

[products.BANANAS]
edge = 1
position_limit = 20
decay = 0.9
cross_mispriced = true

[products.COCONUTS]
edge = 1
position_limit = 600
decay = 0.9
fair_value = {{ model = "linked", counterpart = "PINA_COLADAS", weight = 0.5 }}

[products.PINA_COLADAS]
edge = 1
position_limit = 300
decay = 0.9
fair_value = {{ model = "linked", counterpart = "COCONUTS", weight = 0.8 }}
{extra}
"#
        )
    }

    #[test]
    fn test_explicit_products_match_defaults() {
        let config: StrategyConfig = toml::from_str(&full_products_toml("")).unwrap();
        let parsed = config.resolve().unwrap();
        let defaults = StrategyConfig::default().resolve().unwrap();
        for product in Product::ALL {
            assert_eq!(parsed[product], defaults[product], "{product}");
        }
    }

    #[test]
    fn test_unknown_product_rejected() {
        let toml_str = full_products_toml(
            r#"
[products.STARFRUIT]
edge = 1
position_limit = 20
decay = 0.9
"#,
        );
        let config: StrategyConfig = toml::from_str(&toml_str).unwrap();
        let err = config.resolve().unwrap_err();
        assert!(matches!(err, StrategyError::Core(_)), "{err}");
    }

    #[test]
    fn test_missing_product_rejected() {
        let config: StrategyConfig = toml::from_str(
            r#"
[products.PEARLS]
edge = 0.5
position_limit = 20
decay = 0.99
"#,
        )
        .unwrap();
        let err = config.resolve().unwrap_err();
        assert!(err.to_string().contains("missing parameters for BANANAS"));
    }

    #[test]
    fn test_decay_out_of_range_rejected() {
        let mut config = StrategyConfig::default();
        config.products.get_mut("BANANAS").unwrap().decay = dec!(1);
        assert!(config.resolve().is_err());
        config.products.get_mut("BANANAS").unwrap().decay = dec!(0);
        assert!(config.resolve().is_err());
    }

    #[test]
    fn test_self_link_rejected() {
        let mut config = StrategyConfig::default();
        config.products.get_mut("COCONUTS").unwrap().fair_value = FairValueModel::Linked {
            counterpart: Product::Coconuts,
            weight: dec!(0.5),
        };
        let err = config.resolve().unwrap_err();
        assert!(err.to_string().contains("linked to itself"));
    }

    #[test]
    fn test_global_ranges_rejected() {
        let config = StrategyConfig {
            aggressive_fraction: dec!(1.1),
            ..Default::default()
        };
        assert!(config.resolve().is_err());

        let config = StrategyConfig {
            bid_fallback_price: Price::from(100),
            ask_fallback_price: Price::from(100),
            ..Default::default()
        };
        assert!(config.resolve().is_err());

        let config = StrategyConfig {
            tick_interval: 0,
            ..Default::default()
        };
        assert!(config.resolve().is_err());
    }
}
