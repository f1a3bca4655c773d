//! Solvers for Deals

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    basket::Basket,
    deals::{Deal, DealKey, applications::DealApplication},
};

pub mod permutation;

/// Solver Errors
#[derive(Debug, Error)]
pub enum SolverError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Result of the deal search for the given basket
#[derive(Debug, Clone)]
pub struct SolverResult<'a> {
    /// Indexes of basket items that were consumed by deals
    pub affected_items: SmallVec<[usize; 10]>,

    /// Indexes of basket items that were bought at full price
    pub unaffected_items: SmallVec<[usize; 10]>,

    /// Total cost of the basket after applying deals
    pub total: Money<'a, Currency>,

    /// One attribution per basket item: deal-consumed items in the order the deals consumed
    /// them, then full-price items in basket order
    pub applications: SmallVec<[DealApplication<'a>; 10]>,

    /// Keys of the deals in the winning ordering
    pub ordering: SmallVec<[DealKey; 8]>,

    /// Number of orderings scored during the search
    pub orderings_evaluated: usize,
}

/// Trait for solving deal problems on a basket
pub trait Solver {
    /// Find the cheapest way to apply the deals to the basket
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the solver encounters an error.
    fn solve<'a>(deals: &[Deal<'a>], basket: &Basket<'a>)
    -> Result<SolverResult<'a>, SolverError>;
}
