//! Items

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::products::ProductId;

/// An unprocessed item with a product class, a unit price and a display name.
///
/// Two items are equal when their product and price match; the name is display-only.
#[derive(Clone, Debug)]
pub struct Item<'a> {
    product: ProductId,
    price: Money<'a, Currency>,
    name: String,
}

impl<'a> Item<'a> {
    /// Creates a new item with the given price and no display name.
    #[must_use]
    pub fn new(product: ProductId, price: Money<'a, Currency>) -> Self {
        Self::with_name(product, price, String::new())
    }

    /// Creates a new item with the given price and display name.
    pub fn with_name(
        product: ProductId,
        price: Money<'a, Currency>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            product,
            price,
            name: name.into(),
        }
    }

    /// Returns the product of the item
    pub fn product(&self) -> ProductId {
        self.product
    }

    /// Returns the price of the item
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Returns the display name, falling back to the product id.
    pub fn name(&self) -> String {
        if self.name.is_empty() {
            format!("Item{}", self.product)
        } else {
            self.name.clone()
        }
    }
}

impl PartialEq for Item<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.product == other.product && self.price == other.price
    }
}

/// Order candidate positions ascending by item price.
///
/// The sort is stable: equally priced items keep their relative order. Positions that do not
/// index into `items` are dropped.
pub fn positions_by_price(items: &[Item<'_>], candidates: &[usize]) -> SmallVec<[usize; 16]> {
    let mut priced: SmallVec<[(usize, i64); 16]> = candidates
        .iter()
        .filter_map(|&idx| {
            items
                .get(idx)
                .map(|item| (idx, item.price().to_minor_units()))
        })
        .collect();

    priced.sort_by_key(|&(_, minor)| minor);

    priced.into_iter().map(|(idx, _)| idx).collect()
}
