//! Cheapest Free In Set Deal
//!
//! Buy `N` items from a set of products and the cheapest one is free.

use rusty_money::Money;

use crate::{
    deals::{DealKey, DealMatch, DealMatches},
    items::{Item, positions_by_price},
    products::ProductSet,
};

/// Buy `N` from a set, the cheapest is free.
#[derive(Debug, Clone)]
pub struct CheapestFreeInSetDeal {
    key: DealKey,
    name: Option<String>,
    products: ProductSet,
    target_count: usize,
}

impl CheapestFreeInSetDeal {
    /// Create a new cheapest-free deal over the given products.
    pub fn new(key: DealKey, products: ProductSet, target_count: usize) -> Self {
        Self {
            key,
            name: None,
            products,
            target_count,
        }
    }

    /// Override the generated display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Return the deal key
    pub fn key(&self) -> DealKey {
        self.key
    }

    /// Return the display name
    pub fn name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Buy{}GetCheapestFree", self.target_count))
    }

    /// Qualifying products
    pub fn products(&self) -> &ProductSet {
        &self.products
    }

    /// Number of items in one application of the deal
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Take the `N` cheapest qualifying candidates; the first is free, the rest keep their
    /// price. Fewer than `N` qualifying candidates (or `N == 0`) means no match.
    pub fn evaluate_among<'a>(&self, items: &[Item<'a>], candidates: &[usize]) -> DealMatches<'a> {
        if self.target_count == 0 {
            return DealMatches::new();
        }

        let sorted = positions_by_price(items, candidates);

        let chosen: DealMatches<'a> = sorted
            .iter()
            .filter_map(|&idx| items.get(idx).map(|item| (idx, item)))
            .filter(|(_, item)| self.products.contains(item.product()))
            .take(self.target_count)
            .enumerate()
            .map(|(n, (idx, item))| {
                if n == 0 {
                    DealMatch::new(idx, Money::from_minor(0, item.price().currency()))
                } else {
                    DealMatch::new(idx, *item.price())
                }
            })
            .collect();

        if chosen.len() < self.target_count {
            return DealMatches::new();
        }

        chosen
    }

    /// Whether the item's product is in the set.
    pub fn selects_on(&self, item: &Item<'_>) -> bool {
        self.targets(item)
    }

    /// Whether the item's product is in the set.
    pub fn targets(&self, item: &Item<'_>) -> bool {
        self.products.contains(item.product())
    }
}
