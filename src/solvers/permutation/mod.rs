//! Permutation Solver
//!
//! Exhaustive search over deal orderings. Each ordering is scored by running its deals in turn
//! against a private list of remaining basket positions, repeating each deal until it stops
//! matching. Whatever is left is bought at full price. The cheapest ordering wins.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::{
    basket::Basket,
    deals::{Deal, DealKey, applications::DealApplication},
    items::Item,
    solvers::{Solver, SolverError, SolverResult},
};

pub mod observer;
pub mod orderings;

pub use observer::{NoopObserver, SearchObserver};
pub use orderings::{Ordering, ordering_count, orderings};

/// Number of applicable deals above which the search logs a warning.
///
/// Nine deals already mean 362,881 orderings.
pub const ORDERING_WARN_THRESHOLD: usize = 8;

type ItemIndexList = SmallVec<[usize; 10]>;
type Applications<'a> = SmallVec<[DealApplication<'a>; 10]>;

/// Outcome of scoring one ordering
#[derive(Debug)]
struct ScoredOrdering<'a> {
    total: Money<'a, Currency>,
    applications: Applications<'a>,
}

/// Solver trying every ordering of the applicable deals
///
/// # Cost
///
/// The search is factorial in the number of deals that survive filtering: `n` deals are scored
/// in `n! + 1` orderings, each of which may evaluate every deal once per basket item. Filtering
/// keeps this practical when most deals cannot touch the basket, but callers with many
/// overlapping deals should expect the search to become slow quickly.
#[derive(Debug)]
pub struct PermutationSolver;

impl PermutationSolver {
    /// Solve with an observer following the search.
    ///
    /// # Parameters
    ///
    /// - `deals`: The deal catalog
    /// - `basket`: The items to price
    /// - `observer`: Observer notified of filtering, every scored ordering and the winner
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] if prices cannot be added (e.g. a deal priced in another
    /// currency) or an internal invariant is broken.
    #[tracing::instrument(
        name = "solvers.permutation.solve",
        skip_all,
        fields(
            deal_count = deals.len(),
            item_count = basket.len(),
            applicable_deals = tracing::field::Empty
        ),
        err
    )]
    pub fn solve_with_observer<'a>(
        deals: &[Deal<'a>],
        basket: &Basket<'a>,
        observer: &mut dyn SearchObserver,
    ) -> Result<SolverResult<'a>, SolverError> {
        let items = basket.items();
        let currency = basket.currency();

        let applicable = applicable_deals(deals, items);
        let applicable_keys: SmallVec<[DealKey; 8]> =
            applicable.iter().map(|deal| deal.key()).collect();

        tracing::Span::current().record("applicable_deals", applicable.len());

        observer.on_deals_filtered(deals.len(), &applicable_keys);

        debug!(
            considered = deals.len(),
            applicable = applicable.len(),
            "filtered deals"
        );

        if applicable.len() > ORDERING_WARN_THRESHOLD {
            warn!(
                applicable = applicable.len(),
                orderings = ordering_count(applicable.len()),
                "large deal search"
            );
        }

        // Return early if the basket is empty
        if items.is_empty() {
            return Ok(SolverResult {
                affected_items: SmallVec::new(),
                unaffected_items: SmallVec::new(),
                total: Money::from_minor(0, currency),
                applications: SmallVec::new(),
                ordering: SmallVec::new(),
                orderings_evaluated: 0,
            });
        }

        let candidates = orderings(applicable.len());

        let mut best: Option<(usize, ScoredOrdering<'a>)> = None;

        for (ordering_idx, ordering) in candidates.iter().enumerate() {
            let scored = score_ordering(&applicable, ordering, items, currency)?;
            let total_minor = scored.total.to_minor_units();

            let keys = ordering_keys(&applicable_keys, ordering);

            trace!(ordering_idx, total_minor, "scored ordering");

            observer.on_ordering_scored(ordering_idx, &keys, total_minor);

            // Strictly cheaper only: earlier orderings win ties
            let improves = best
                .as_ref()
                .is_none_or(|(_, current)| total_minor < current.total.to_minor_units());

            if improves {
                best = Some((ordering_idx, scored));
            }
        }

        let Some((best_idx, best)) = best else {
            return Err(SolverError::InvariantViolation {
                message: "no ordering was scored",
            });
        };

        let ordering = candidates
            .get(best_idx)
            .map(|ordering| ordering_keys(&applicable_keys, ordering))
            .unwrap_or_default();

        observer.on_best_ordering(best_idx, &ordering, best.total.to_minor_units());

        debug!(
            ordering_idx = best_idx,
            total_minor = best.total.to_minor_units(),
            "selected best ordering"
        );

        ensure_every_item_attributed(best.applications.len(), items.len())?;

        let (affected_items, unaffected_items) = partition_items(&best.applications);

        Ok(SolverResult {
            affected_items,
            unaffected_items,
            total: best.total,
            applications: best.applications,
            ordering,
            orderings_evaluated: candidates.len(),
        })
    }
}

impl Solver for PermutationSolver {
    fn solve<'a>(
        deals: &[Deal<'a>],
        basket: &Basket<'a>,
    ) -> Result<SolverResult<'a>, SolverError> {
        let mut observer = NoopObserver;

        Self::solve_with_observer(deals, basket, &mut observer)
    }
}

/// Keep the deals that could select or target at least one item, in catalog order.
fn applicable_deals<'d, 'a>(deals: &'d [Deal<'a>], items: &[Item<'a>]) -> Vec<&'d Deal<'a>> {
    deals
        .iter()
        .filter(|deal| deal.is_applicable(items))
        .collect()
}

fn ordering_keys(keys: &[DealKey], ordering: &[usize]) -> SmallVec<[DealKey; 8]> {
    ordering
        .iter()
        .filter_map(|&deal_idx| keys.get(deal_idx).copied())
        .collect()
}

/// Run one ordering of deals against a fresh copy of the basket positions.
fn score_ordering<'a>(
    deals: &[&Deal<'a>],
    ordering: &[usize],
    items: &[Item<'a>],
    currency: &'a Currency,
) -> Result<ScoredOrdering<'a>, SolverError> {
    let mut remaining: ItemIndexList = (0..items.len()).collect();
    let mut applications = Applications::new();
    let mut total = Money::from_minor(0, currency);
    let mut next_bundle_id: usize = 0;

    for &deal_idx in ordering {
        let deal = deals.get(deal_idx).ok_or(SolverError::InvariantViolation {
            message: "ordering refers to a deal outside the applicable set",
        })?;

        // Repeat the deal until it stops consuming items
        loop {
            let matches = deal.evaluate_among(items, &remaining);
            let mut consumed = 0_usize;

            for matched in &matches {
                let Some(pos) = remaining.iter().position(|&idx| idx == matched.item_idx) else {
                    continue;
                };

                remaining.remove(pos);

                let item = items
                    .get(matched.item_idx)
                    .ok_or(SolverError::InvariantViolation {
                        message: "deal matched an item outside the basket",
                    })?;

                total = total.add(matched.price)?;

                applications.push(DealApplication {
                    deal_key: Some(deal.key()),
                    item_idx: matched.item_idx,
                    bundle_id: next_bundle_id,
                    original_price: *item.price(),
                    final_price: matched.price,
                });

                consumed += 1;
            }

            if consumed == 0 {
                break;
            }

            next_bundle_id += 1;
        }
    }

    for &item_idx in &remaining {
        let item = items.get(item_idx).ok_or(SolverError::InvariantViolation {
            message: "remaining position outside the basket",
        })?;

        total = total.add(*item.price())?;

        applications.push(DealApplication::full_price(item_idx, *item.price()));
    }

    Ok(ScoredOrdering {
        total,
        applications,
    })
}

/// Ensure that every basket item received exactly one attribution.
fn ensure_every_item_attributed(applications: usize, items: usize) -> Result<(), SolverError> {
    if applications != items {
        return Err(SolverError::InvariantViolation {
            message: "attribution count does not match number of basket items",
        });
    }

    Ok(())
}

fn partition_items(applications: &[DealApplication<'_>]) -> (ItemIndexList, ItemIndexList) {
    let mut affected = ItemIndexList::new();
    let mut unaffected = ItemIndexList::new();

    for app in applications {
        if app.is_deal() {
            affected.push(app.item_idx);
        } else {
            unaffected.push(app.item_idx);
        }
    }

    (affected, unaffected)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use slotmap::SlotMap;
    use testresult::TestResult;

    use crate::{
        deals::{CheapestFreeInSetDeal, QuantityThresholdDeal},
        products::{ProductId, ProductSet},
    };

    use super::*;

    fn item<'a>(id: u32, price: i64) -> Item<'a> {
        Item::new(ProductId::new(id), Money::from_minor(price, GBP))
    }

    fn basket<'a>(items: Vec<Item<'a>>) -> Result<Basket<'a>, crate::basket::BasketError> {
        Basket::with_items(items, GBP)
    }

    fn threshold<'a>(
        key: DealKey,
        a: usize,
        x: u32,
        b: usize,
        y: u32,
        z: i64,
    ) -> Deal<'a> {
        Deal::from(QuantityThresholdDeal::new(
            key,
            a,
            ProductId::new(x),
            b,
            ProductId::new(y),
            Money::from_minor(z, GBP),
        ))
    }

    #[derive(Default)]
    struct RecordingObserver {
        kept: Vec<DealKey>,
        scored: Vec<(usize, Vec<DealKey>, i64)>,
        best: Option<(usize, i64)>,
    }

    impl SearchObserver for RecordingObserver {
        fn on_deals_filtered(&mut self, _considered: usize, kept: &[DealKey]) {
            self.kept = kept.to_vec();
        }

        fn on_ordering_scored(&mut self, ordering_idx: usize, ordering: &[DealKey], total: i64) {
            self.scored.push((ordering_idx, ordering.to_vec(), total));
        }

        fn on_best_ordering(&mut self, ordering_idx: usize, _ordering: &[DealKey], total: i64) {
            self.best = Some((ordering_idx, total));
        }
    }

    #[test]
    fn empty_basket_totals_zero() -> TestResult {
        let basket = Basket::new(GBP);

        let result = PermutationSolver::solve(&[], &basket)?;

        assert_eq!(result.total, Money::from_minor(0, GBP));
        assert!(result.applications.is_empty());
        assert_eq!(result.orderings_evaluated, 0);

        Ok(())
    }

    #[test]
    fn no_deals_charges_full_price() -> TestResult {
        let basket = basket(vec![item(1, 100), item(2, 250)])?;

        let result = PermutationSolver::solve(&[], &basket)?;

        assert_eq!(result.total, Money::from_minor(350, GBP));
        assert_eq!(result.unaffected_items.as_slice(), &[0, 1]);
        assert!(result.affected_items.is_empty());
        assert_eq!(result.orderings_evaluated, 2);

        Ok(())
    }

    #[test]
    fn deal_repeats_until_it_stops_matching() -> TestResult {
        let basket = basket(vec![item(1, 100); 5])?;
        let deals = [threshold(DealKey::default(), 2, 1, 1, 1, 25)];

        let result = PermutationSolver::solve(&deals, &basket)?;

        // Two bundles of (25 + 100), one item left over
        assert_eq!(result.total, Money::from_minor(350, GBP));
        assert_eq!(result.affected_items.len(), 4);
        assert_eq!(result.unaffected_items.as_slice(), &[4]);

        let bundles: Vec<usize> = result
            .applications
            .iter()
            .filter(|app| app.is_deal())
            .map(|app| app.bundle_id)
            .collect();

        assert_eq!(bundles, vec![0, 0, 1, 1]);

        Ok(())
    }

    #[test]
    fn every_item_is_attributed_exactly_once() -> TestResult {
        let basket = basket(vec![
            item(1, 100),
            item(1, 100),
            item(2, 200),
            item(1, 100),
            item(2, 200),
        ])?;

        let set = ProductSet::from_ids(&[1, 2]);
        let deals = [
            threshold(DealKey::default(), 2, 1, 1, 1, 25),
            Deal::from(CheapestFreeInSetDeal::new(DealKey::default(), set, 2)),
        ];

        let result = PermutationSolver::solve(&deals, &basket)?;

        let mut seen: Vec<usize> = result.applications.iter().map(|app| app.item_idx).collect();
        seen.sort_unstable();

        assert_eq!(seen, vec![0, 1, 2, 3, 4]);

        Ok(())
    }

    #[test]
    fn deals_that_cannot_apply_are_filtered_out() -> TestResult {
        let mut keys = SlotMap::<DealKey, ()>::with_key();
        let relevant = keys.insert(());
        let irrelevant = keys.insert(());

        let basket = basket(vec![item(1, 100), item(1, 100)])?;
        let deals = [
            threshold(irrelevant, 1, 9, 1, 9, 1),
            threshold(relevant, 2, 1, 1, 1, 25),
        ];

        let mut observer = RecordingObserver::default();
        let result = PermutationSolver::solve_with_observer(&deals, &basket, &mut observer)?;

        assert_eq!(observer.kept, vec![relevant]);
        assert_eq!(result.orderings_evaluated, 2);
        assert_eq!(result.ordering.as_slice(), &[relevant]);

        Ok(())
    }

    #[test]
    fn observer_sees_every_ordering_and_the_winner() -> TestResult {
        let mut keys = SlotMap::<DealKey, ()>::with_key();
        let first = keys.insert(());
        let second = keys.insert(());

        let basket = basket(vec![item(1, 100), item(1, 100)])?;
        let deals = [
            threshold(first, 2, 1, 1, 1, 25),
            threshold(second, 2, 1, 1, 1, 22),
        ];

        let mut observer = RecordingObserver::default();
        let result = PermutationSolver::solve_with_observer(&deals, &basket, &mut observer)?;

        assert_eq!(
            observer.scored,
            vec![
                (0, vec![first, second], 125),
                (1, vec![second, first], 122),
                (2, vec![], 200),
            ]
        );
        assert_eq!(observer.best, Some((1, 122)));
        assert_eq!(result.ordering.as_slice(), &[second, first]);

        Ok(())
    }

    #[test]
    fn ties_keep_the_earliest_ordering() -> TestResult {
        let mut keys = SlotMap::<DealKey, ()>::with_key();
        let first = keys.insert(());
        let second = keys.insert(());

        let basket = basket(vec![item(1, 100), item(1, 100)])?;
        let deals = [
            threshold(first, 2, 1, 1, 1, 25),
            threshold(second, 2, 1, 1, 1, 25),
        ];

        let result = PermutationSolver::solve(&deals, &basket)?;

        assert_eq!(result.total, Money::from_minor(125, GBP));
        assert_eq!(result.ordering.as_slice(), &[first, second]);

        Ok(())
    }

    #[test]
    fn never_costs_more_than_full_price() -> TestResult {
        let basket = basket(vec![item(1, 100), item(1, 100), item(1, 100)])?;
        let deals = [threshold(DealKey::default(), 3, 1, 3, 1, 101)];

        let result = PermutationSolver::solve(&deals, &basket)?;

        assert_eq!(result.total, Money::from_minor(300, GBP));
        assert!(result.ordering.is_empty());
        assert!(result.applications.iter().all(|app| !app.is_deal()));

        Ok(())
    }

    #[test]
    fn deal_priced_in_another_currency_is_an_error() -> TestResult {
        let basket = basket(vec![item(1, 100)])?;
        let deals = [Deal::from(QuantityThresholdDeal::new(
            DealKey::default(),
            1,
            ProductId::new(1),
            1,
            ProductId::new(1),
            Money::from_minor(50, USD),
        ))];

        let result = PermutationSolver::solve(&deals, &basket);

        assert!(matches!(result, Err(SolverError::Money(_))));

        Ok(())
    }

    #[test]
    fn ensure_every_item_attributed_detects_mismatch() {
        assert!(ensure_every_item_attributed(2, 2).is_ok());
        assert!(matches!(
            ensure_every_item_attributed(1, 2),
            Err(SolverError::InvariantViolation { .. })
        ));
    }
}
