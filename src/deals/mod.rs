//! Deals
//!
//! A deal decides which items of a basket it applies to and what each of those items costs.
//! Deals report matches by position, so a solver can consume exactly the matched items from
//! its own working list. An empty result means the deal does not apply (right now); it is not
//! an error.

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::items::Item;

pub mod applications;
pub mod cheapest_free;
pub mod composite;
pub mod encoding;
pub mod quantity_threshold;

pub use cheapest_free::CheapestFreeInSetDeal;
pub use composite::{ClauseKind, CompositeDeal, DealClause};
pub use quantity_threshold::QuantityThresholdDeal;

new_key_type! {
    /// Deal Key
    pub struct DealKey;
}

/// One item matched by a deal evaluation and the price the deal charges for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DealMatch<'a> {
    /// Position of the item in the evaluated item list
    pub item_idx: usize,

    /// Price charged for the item under the deal
    pub price: Money<'a, Currency>,
}

impl<'a> DealMatch<'a> {
    /// Create a new deal match.
    pub fn new(item_idx: usize, price: Money<'a, Currency>) -> Self {
        Self { item_idx, price }
    }
}

/// Items matched by one deal evaluation.
pub type DealMatches<'a> = SmallVec<[DealMatch<'a>; 8]>;

/// Deal enum
#[derive(Debug, Clone)]
pub enum Deal<'a> {
    /// Buy A of X, get B of Y for Z each
    QuantityThreshold(QuantityThresholdDeal<'a>),

    /// Buy N from a set, cheapest is free
    CheapestFreeInSet(CheapestFreeInSetDeal),

    /// Clause-composed deal (e.g. meal deals)
    Composite(CompositeDeal<'a>),
}

impl<'a> Deal<'a> {
    /// Return the deal key.
    pub fn key(&self) -> DealKey {
        match self {
            Deal::QuantityThreshold(deal) => deal.key(),
            Deal::CheapestFreeInSet(deal) => deal.key(),
            Deal::Composite(deal) => deal.key(),
        }
    }

    /// Return the display name of the deal.
    pub fn name(&self) -> String {
        match self {
            Deal::QuantityThreshold(deal) => deal.name(),
            Deal::CheapestFreeInSet(deal) => deal.name(),
            Deal::Composite(deal) => deal.name(),
        }
    }

    /// Evaluate the deal once against every item.
    pub fn evaluate(&self, items: &[Item<'a>]) -> DealMatches<'a> {
        let candidates: SmallVec<[usize; 16]> = (0..items.len()).collect();

        self.evaluate_among(items, &candidates)
    }

    /// Evaluate the deal once against the items at the candidate positions.
    ///
    /// Returned positions index into `items`.
    pub fn evaluate_among(&self, items: &[Item<'a>], candidates: &[usize]) -> DealMatches<'a> {
        match self {
            Deal::QuantityThreshold(deal) => deal.evaluate_among(items, candidates),
            Deal::CheapestFreeInSet(deal) => deal.evaluate_among(items, candidates),
            Deal::Composite(deal) => deal.evaluate_among(items, candidates),
        }
    }

    /// Whether the item could ever satisfy part of this deal's qualifying condition.
    pub fn selects_on(&self, item: &Item<'a>) -> bool {
        match self {
            Deal::QuantityThreshold(deal) => deal.selects_on(item),
            Deal::CheapestFreeInSet(deal) => deal.selects_on(item),
            Deal::Composite(deal) => deal.selects_on(item),
        }
    }

    /// Whether the item could ever be repriced by this deal.
    pub fn targets(&self, item: &Item<'a>) -> bool {
        match self {
            Deal::QuantityThreshold(deal) => deal.targets(item),
            Deal::CheapestFreeInSet(deal) => deal.targets(item),
            Deal::Composite(deal) => deal.targets(item),
        }
    }

    /// Return whether this deal *might* apply to any of the given items.
    pub fn is_applicable(&self, items: &[Item<'a>]) -> bool {
        items
            .iter()
            .any(|item| self.selects_on(item) || self.targets(item))
    }
}

impl<'a> From<QuantityThresholdDeal<'a>> for Deal<'a> {
    fn from(deal: QuantityThresholdDeal<'a>) -> Self {
        Deal::QuantityThreshold(deal)
    }
}

impl From<CheapestFreeInSetDeal> for Deal<'_> {
    fn from(deal: CheapestFreeInSetDeal) -> Self {
        Deal::CheapestFreeInSet(deal)
    }
}

impl<'a> From<CompositeDeal<'a>> for Deal<'a> {
    fn from(deal: CompositeDeal<'a>) -> Self {
        Deal::Composite(deal)
    }
}
