//! Deal Applications

use rusty_money::{Money, MoneyError, iso::Currency};

use crate::deals::DealKey;

/// Final attribution of one basket item: the deal that priced it (if any) and its price.
#[derive(Debug, Clone)]
pub struct DealApplication<'a> {
    /// Key of the deal that was applied, `None` for full-price items
    pub deal_key: Option<DealKey>,

    /// Index of the item in the basket
    pub item_idx: usize,

    /// ID assigned to the items consumed by the same deal evaluation
    pub bundle_id: usize,

    /// Original price of the item
    pub original_price: Money<'a, Currency>,

    /// Final price after the deal
    pub final_price: Money<'a, Currency>,
}

impl<'a> DealApplication<'a> {
    /// Attribute an item to no deal, at its original price.
    pub fn full_price(item_idx: usize, price: Money<'a, Currency>) -> Self {
        Self {
            deal_key: None,
            item_idx,
            bundle_id: 0,
            original_price: price,
            final_price: price,
        }
    }

    /// Whether the item was priced by a deal.
    pub fn is_deal(&self) -> bool {
        self.deal_key.is_some()
    }

    /// Whether the deal changed the item's price.
    pub fn is_repriced(&self) -> bool {
        self.original_price != self.final_price
    }

    /// Calculate the item savings from this deal application
    ///
    /// # Errors
    ///
    /// Returns an error if the original price or final price cannot be subtracted.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.original_price.sub(self.final_price)
    }
}
