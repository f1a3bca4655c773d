//! Products

use std::{fmt, num::ParseIntError, str::FromStr};

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

/// Product class identifier.
///
/// Items with the same product id are interchangeable for set-based matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProductId(u32);

impl ProductId {
    /// Create a new product id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw numeric id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(Self)
    }
}

/// An immutable set of product ids.
///
/// Stored sorted and de-duplicated in a `SmallVec`, so membership is a binary search and
/// iteration order is stable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductSet {
    ids: SmallVec<[ProductId; 8]>,
}

impl ProductSet {
    /// Create a new product set from any collection of ids.
    pub fn new(ids: impl IntoIterator<Item = ProductId>) -> Self {
        let mut ids: SmallVec<[ProductId; 8]> = ids.into_iter().collect();

        ids.sort_unstable();
        ids.dedup();

        Self { ids }
    }

    /// Create a product set from raw numeric ids.
    pub fn from_ids(ids: &[u32]) -> Self {
        Self::new(ids.iter().copied().map(ProductId::new))
    }

    /// Whether the set contains the product.
    pub fn contains(&self, product: ProductId) -> bool {
        self.ids.binary_search(&product).is_ok()
    }

    /// Iterate over the ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.ids.iter().copied()
    }

    /// Number of distinct ids in the set.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<ProductId> for ProductSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product class
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product price
    pub price: Money<'a, Currency>,
}
