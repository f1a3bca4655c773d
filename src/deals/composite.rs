//! Composite Deal
//!
//! A deal built from an ordered list of clauses, each pairing a selection selector (what you
//! must buy) with a target selector (what gets repriced) and a unit price for the targets.
//!
//! Some shapes this covers:
//!
//! - Buy one get one free on a set: selection `CountedCheapestInSet(2)`, target
//!   `SingleInSet`, price `0`.
//! - Meal deal: one strict clause per course, each `SingleInSet` / `SingleInSet` at the
//!   course's share of the meal price.
//! - Meal deal with an optional extra course: as above plus an optional clause.
//!
//! Clauses run left to right against a shrinking working list, so two clauses never claim the
//! same item. A strict clause that finds no selection or no target voids the whole deal; an
//! optional one is skipped.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    deals::{DealKey, DealMatch, DealMatches},
    items::Item,
    selectors::Selector,
};

/// Whether a clause is required for the deal to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    /// Failing to match voids the whole deal
    Strict,

    /// Failing to match skips this clause only
    Optional,
}

/// One selection / target / price triple of a composite deal.
#[derive(Debug, Clone)]
pub struct DealClause<'a> {
    /// Items that qualify the clause
    pub selection: Selector<'a>,

    /// Items repriced by the clause
    pub target: Selector<'a>,

    /// Unit price for every target item
    pub price: Money<'a, Currency>,

    /// Strict or optional
    pub kind: ClauseKind,
}

impl<'a> DealClause<'a> {
    /// Create a clause that must match for the deal to apply.
    pub fn strict(selection: Selector<'a>, target: Selector<'a>, price: Money<'a, Currency>) -> Self {
        Self {
            selection,
            target,
            price,
            kind: ClauseKind::Strict,
        }
    }

    /// Create a clause that is skipped when it does not match.
    pub fn optional(
        selection: Selector<'a>,
        target: Selector<'a>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            selection,
            target,
            price,
            kind: ClauseKind::Optional,
        }
    }

    /// Whether the clause is strict
    pub fn is_strict(&self) -> bool {
        self.kind == ClauseKind::Strict
    }
}

/// Clause-composed deal.
#[derive(Debug, Clone)]
pub struct CompositeDeal<'a> {
    key: DealKey,
    name: Option<String>,
    clauses: Vec<DealClause<'a>>,
}

impl<'a> CompositeDeal<'a> {
    /// Create a new composite deal from its clauses, evaluated in order.
    pub fn new(key: DealKey, clauses: impl Into<Vec<DealClause<'a>>>) -> Self {
        Self {
            key,
            name: None,
            clauses: clauses.into(),
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
            .unwrap_or_else(|| "Composite Deal".to_string())
    }

    /// The clauses, in evaluation order
    pub fn clauses(&self) -> &[DealClause<'a>] {
        &self.clauses
    }

    /// Evaluate every clause against the candidates.
    pub fn evaluate_among(&self, items: &[Item<'a>], candidates: &[usize]) -> DealMatches<'a> {
        let mut working: SmallVec<[usize; 16]> = candidates.iter().copied().collect();
        let mut matches = DealMatches::new();

        for clause in &self.clauses {
            let selected = clause.selection.select_among(items, &working);

            if selected.is_empty() {
                if clause.is_strict() {
                    return DealMatches::new();
                }

                continue;
            }

            let targeted = clause.target.select_among(items, &working);

            if targeted.is_empty() {
                if clause.is_strict() {
                    return DealMatches::new();
                }

                continue;
            }

            for &idx in &targeted {
                matches.push(DealMatch::new(idx, clause.price));
            }

            // An item picked by both selectors is only attributed once, as a target.
            for &idx in selected.iter().filter(|&&idx| !targeted.contains(&idx)) {
                if let Some(item) = items.get(idx) {
                    matches.push(DealMatch::new(idx, *item.price()));
                }
            }

            working.retain(|idx| !targeted.contains(idx) && !selected.contains(idx));
        }

        matches
    }

    /// Whether any clause's selection could choose the item.
    pub fn selects_on(&self, item: &Item<'a>) -> bool {
        self.clauses
            .iter()
            .any(|clause| clause.selection.matches(item))
    }

    /// Whether any clause's target could choose the item.
    pub fn targets(&self, item: &Item<'a>) -> bool {
        self.clauses.iter().any(|clause| clause.target.matches(item))
    }
}
