//! Search Observer

use crate::deals::DealKey;

/// Observer trait for following a deal search as it runs.
///
/// The solver calls back at each step of the search so tests and tools can inspect which deals
/// were kept, how every ordering scored and which one won, without duplicating solver logic.
pub trait SearchObserver {
    /// Called once the deals that cannot touch the basket have been removed.
    ///
    /// # Parameters
    ///
    /// - `considered`: Number of deals passed to the solver
    /// - `kept`: Keys of the deals that survived filtering, in input order
    fn on_deals_filtered(&mut self, _considered: usize, _kept: &[DealKey]) {}

    /// Called after each ordering has been scored.
    ///
    /// # Parameters
    ///
    /// - `ordering_idx`: Position of the ordering in the search
    /// - `ordering`: Keys of the deals in the order they were applied
    /// - `total_minor`: Basket total for this ordering in minor units
    fn on_ordering_scored(&mut self, ordering_idx: usize, ordering: &[DealKey], total_minor: i64);

    /// Called once when the search has finished, with the winning ordering.
    fn on_best_ordering(&mut self, _ordering_idx: usize, _ordering: &[DealKey], _total_minor: i64) {
    }
}

/// No-op observer for unobserved searches.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_ordering_scored(&mut self, _: usize, _: &[DealKey], _: i64) {}
}
