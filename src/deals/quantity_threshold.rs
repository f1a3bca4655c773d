//! Quantity Threshold Deal
//!
//! Buy `A` items of product `X`, get `B` items of product `Y` for `Z` each.
//!
//! Covers same-product offers ("buy 3 get 1 free": `X == Y`, the repriced items count
//! towards the qualifying quantity) as well as cross-product offers ("buy 3 sandwiches, get a
//! drink for 22p").

use rusty_money::{Money, iso::Currency};

use crate::{
    deals::{DealKey, DealMatch, DealMatches},
    items::Item,
    products::ProductId,
};

/// Buy `A` of `X`, get `B` of `Y` for `Z`.
#[derive(Debug, Clone)]
pub struct QuantityThresholdDeal<'a> {
    key: DealKey,
    name: Option<String>,
    selection_count: usize,
    selection_product: ProductId,
    target_count: usize,
    target_product: ProductId,
    target_price: Money<'a, Currency>,
}

impl<'a> QuantityThresholdDeal<'a> {
    /// Create a new quantity threshold deal.
    pub fn new(
        key: DealKey,
        selection_count: usize,
        selection_product: ProductId,
        target_count: usize,
        target_product: ProductId,
        target_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            key,
            name: None,
            selection_count,
            selection_product,
            target_count,
            target_product,
            target_price,
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
        self.name.clone().unwrap_or_else(|| {
            format!(
                "Buy{}Of{}Get{}Of{}For{}UnitPrice",
                self.selection_count,
                self.selection_product,
                self.target_count,
                self.target_product,
                self.target_price.to_minor_units()
            )
        })
    }

    /// Number of qualifying items required (`A`)
    pub fn selection_count(&self) -> usize {
        self.selection_count
    }

    /// Qualifying product (`X`)
    pub fn selection_product(&self) -> ProductId {
        self.selection_product
    }

    /// Number of items repriced (`B`)
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Repriced product (`Y`)
    pub fn target_product(&self) -> ProductId {
        self.target_product
    }

    /// Unit price of repriced items (`Z`)
    pub fn target_price(&self) -> &Money<'a, Currency> {
        &self.target_price
    }

    /// Single pass over the candidates.
    ///
    /// Target matches are taken first (and also count as selections when `X == Y`); other
    /// `X` items are kept at their own price until `A` selections are counted. If either
    /// threshold is short at the end, nothing matches.
    pub fn evaluate_among(&self, items: &[Item<'a>], candidates: &[usize]) -> DealMatches<'a> {
        let same_product = self.selection_product == self.target_product;

        let mut matches = DealMatches::new();
        let mut targets = 0;
        let mut selections = 0;

        for &idx in candidates {
            if targets >= self.target_count && selections >= self.selection_count {
                break;
            }

            let Some(item) = items.get(idx) else {
                continue;
            };

            if item.product() == self.target_product && targets < self.target_count {
                matches.push(DealMatch::new(idx, self.target_price));
                targets += 1;

                if same_product {
                    selections += 1;
                }
            } else if item.product() == self.selection_product
                && selections < self.selection_count
            {
                matches.push(DealMatch::new(idx, *item.price()));
                selections += 1;
            }
        }

        if targets < self.target_count || selections < self.selection_count {
            return DealMatches::new();
        }

        matches
    }

    /// Whether the item is of the qualifying product.
    pub fn selects_on(&self, item: &Item<'_>) -> bool {
        item.product() == self.selection_product
    }

    /// Whether the item is of the repriced product.
    pub fn targets(&self, item: &Item<'_>) -> bool {
        item.product() == self.target_product
    }
}
