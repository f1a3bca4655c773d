//! Checkout
//!
//! Checkout prices a basket of items against a catalog of overlapping deals and finds the
//! cheapest way to apply them.
//!
//! Deals compete for the same items, so the order they are applied in matters. The
//! [`solvers::permutation::PermutationSolver`] scores every ordering of the deals that could
//! touch the basket and keeps the cheapest, attributing every item to exactly one deal or to
//! none.

pub mod basket;
pub mod deals;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod selectors;
pub mod solvers;
pub mod utils;
