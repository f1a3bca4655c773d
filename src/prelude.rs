//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError},
    deals::{
        CheapestFreeInSetDeal, ClauseKind, CompositeDeal, Deal, DealClause, DealKey, DealMatch,
        QuantityThresholdDeal,
        applications::DealApplication,
        encoding::{DealEncodingError, decode, encode},
    },
    fixtures::{Fixture, FixtureError},
    items::Item,
    pricing::{TotalPriceError, total_price},
    products::{Product, ProductId, ProductSet},
    receipt::{Receipt, ReceiptError},
    selectors::{Selection, Selector},
    solvers::{
        Solver, SolverError, SolverResult,
        permutation::{NoopObserver, PermutationSolver, SearchObserver},
    },
};
