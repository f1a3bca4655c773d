//! Deal Orderings
//!
//! Deals compete for the same items, so the order in which they run changes the result. The
//! search scores every ordering of the applicable deals.

use smallvec::SmallVec;

/// One ordering of deals, as indexes into the deal list.
pub type Ordering = SmallVec<[usize; 8]>;

/// All permutations of `0..count`, followed by the empty ordering.
///
/// Permutations are built by recursive insertion: the first index is inserted at every position
/// of every permutation of the remaining indexes. `count` deals give `count! + 1` orderings,
/// and zero deals give two empty orderings.
pub fn orderings(count: usize) -> Vec<Ordering> {
    let indexes: Ordering = (0..count).collect();

    let mut result = permutations(&indexes);

    result.push(Ordering::new());

    result
}

/// Number of orderings [`orderings`] returns for `count` deals, saturating on overflow.
pub fn ordering_count(count: usize) -> usize {
    (1..=count)
        .try_fold(1_usize, usize::checked_mul)
        .map_or(usize::MAX, |n| n.saturating_add(1))
}

fn permutations(indexes: &[usize]) -> Vec<Ordering> {
    let Some((&first, rest)) = indexes.split_first() else {
        return vec![Ordering::new()];
    };

    let mut result = Vec::new();

    for permutation in permutations(rest) {
        for position in 0..=permutation.len() {
            let mut ordering = permutation.clone();
            ordering.insert(position, first);
            result.push(ordering);
        }
    }

    result
}
