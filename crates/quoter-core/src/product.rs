//! The closed set of tradable products and dense per-product storage.
//!
//! Every per-product table in the strategy is a `ProductMap`, indexed by the
//! `Product` discriminant. A product outside this set cannot be represented,
//! so unknown symbols are rejected when the input or the config is decoded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::CoreError;

/// Tradable product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Product {
    Pearls,
    Bananas,
    Coconuts,
    PinaColadas,
}

impl Product {
    /// Number of products.
    pub const COUNT: usize = 4;

    /// All products in index order.
    pub const ALL: [Product; Product::COUNT] = [
        Product::Pearls,
        Product::Bananas,
        Product::Coconuts,
        Product::PinaColadas,
    ];

    /// Dense index of this product.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Exchange symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Pearls => "PEARLS",
            Self::Bananas => "BANANAS",
            Self::Coconuts => "COCONUTS",
            Self::PinaColadas => "PINA_COLADAS",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Product {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Product::ALL
            .into_iter()
            .find(|p| p.symbol() == s)
            .ok_or_else(|| CoreError::UnknownProduct(s.to_string()))
    }
}

/// One value per product, stored densely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductMap<T>([T; Product::COUNT]);

impl<T> ProductMap<T> {
    /// Build a map by evaluating `f` for every product.
    pub fn from_fn(mut f: impl FnMut(Product) -> T) -> Self {
        Self(std::array::from_fn(|i| f(Product::ALL[i])))
    }

    /// Build a map by evaluating a fallible `f` for every product.
    pub fn try_from_fn<E>(mut f: impl FnMut(Product) -> Result<T, E>) -> Result<Self, E> {
        let [pearls, bananas, coconuts, pina_coladas] = Product::ALL;
        Ok(Self([
            f(pearls)?,
            f(bananas)?,
            f(coconuts)?,
            f(pina_coladas)?,
        ]))
    }

    /// Iterate over `(product, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Product, &T)> {
        Product::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterate mutably over `(product, value)` pairs in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Product, &mut T)> {
        Product::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl<T> Index<Product> for ProductMap<T> {
    type Output = T;

    #[inline]
    fn index(&self, product: Product) -> &T {
        &self.0[product.index()]
    }
}

impl<T> IndexMut<Product> for ProductMap<T> {
    #[inline]
    fn index_mut(&mut self, product: Product) -> &mut T {
        &mut self.0[product.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_roundtrip() {
        for product in Product::ALL {
            assert_eq!(product.symbol().parse::<Product>().unwrap(), product);
        }
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let err = "STARFRUIT".parse::<Product>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownProduct(s) if s == "STARFRUIT"));
    }

    #[test]
    fn test_serde_uses_exchange_symbols() {
        let json = serde_json::to_string(&Product::PinaColadas).unwrap();
        assert_eq!(json, "\"PINA_COLADAS\"");
        assert!(serde_json::from_str::<Product>("\"DIVING_GEAR\"").is_err());
    }

    #[test]
    fn test_product_map_indexing() {
        let mut map = ProductMap::from_fn(|p| p.index() * 10);
        assert_eq!(map[Product::Coconuts], 20);
        map[Product::Coconuts] += 1;
        assert_eq!(map[Product::Coconuts], 21);
        let collected: Vec<_> = map.iter().map(|(p, v)| (p, *v)).collect();
        assert_eq!(collected[0], (Product::Pearls, 0));
        assert_eq!(collected[3], (Product::PinaColadas, 30));
    }

    #[test]
    fn test_try_from_fn_propagates_error() {
        let result: Result<ProductMap<u8>, &str> = ProductMap::try_from_fn(|p| {
            if p == Product::Bananas {
                Err("no bananas")
            } else {
                Ok(1)
            }
        });
        assert_eq!(result.unwrap_err(), "no bananas");
    }
}
