//! Selectors
//!
//! A selector picks a sub-sequence of items matching a rule. Selectors never mutate their
//! input: they report the *positions* of the matched items, so callers can consume them from
//! their own working list.
//!
//! Counted selectors are all-or-nothing: if the quantity requirement is not fully met they
//! return an empty selection. [`Selector::GreedyAnyInSet`] has no minimum.

use smallvec::SmallVec;

use crate::{
    items::{Item, positions_by_price},
    products::ProductSet,
};

/// Positions of matched items, in match order.
pub type Selection = SmallVec<[usize; 8]>;

/// Item selection rule.
#[derive(Debug, Clone)]
pub enum Selector<'a> {
    /// The first occurrence of a specific item.
    SingleItem(Item<'a>),

    /// Exactly `count` occurrences of a specific item, in input order.
    CountedSpecificItem {
        /// Item to match
        item: Item<'a>,

        /// Required number of occurrences
        count: usize,
    },

    /// Exactly `count` items whose product is in the set, in input order.
    CountedAnyInSet {
        /// Qualifying products
        products: ProductSet,

        /// Required number of items
        count: usize,
    },

    /// Every item whose product is in the set.
    GreedyAnyInSet(ProductSet),

    /// The `count` cheapest items whose product is in the set.
    CountedCheapestInSet {
        /// Qualifying products
        products: ProductSet,

        /// Required number of items
        count: usize,
    },

    /// The single cheapest item whose product is in the set.
    SingleInSet(ProductSet),
}

impl<'a> Selector<'a> {
    /// Select from every item in `items`.
    pub fn select(&self, items: &[Item<'a>]) -> Selection {
        let candidates: SmallVec<[usize; 16]> = (0..items.len()).collect();

        self.select_among(items, &candidates)
    }

    /// Select from the items at the given candidate positions.
    ///
    /// Returned positions index into `items`. Candidates are scanned in the order given.
    pub fn select_among(&self, items: &[Item<'a>], candidates: &[usize]) -> Selection {
        match self {
            Selector::SingleItem(item) => take_exactly(items, candidates, 1, |c| c == item),
            Selector::CountedSpecificItem { item, count } => {
                take_exactly(items, candidates, *count, |c| c == item)
            }
            Selector::CountedAnyInSet { products, count } => {
                take_exactly(items, candidates, *count, |c| products.contains(c.product()))
            }
            Selector::GreedyAnyInSet(products) => candidates
                .iter()
                .copied()
                .filter(|&idx| {
                    items
                        .get(idx)
                        .is_some_and(|c| products.contains(c.product()))
                })
                .collect(),
            Selector::CountedCheapestInSet { products, count } => {
                let sorted = positions_by_price(items, candidates);

                take_exactly(items, &sorted, *count, |c| products.contains(c.product()))
            }
            Selector::SingleInSet(products) => {
                let sorted = positions_by_price(items, candidates);

                take_exactly(items, &sorted, 1, |c| products.contains(c.product()))
            }
        }
    }

    /// Whether this selector could ever choose the given item.
    ///
    /// Unlike running [`Selector::select`] on a single-item list, this ignores quantity
    /// thresholds, so it never reports a false negative.
    pub fn matches(&self, item: &Item<'a>) -> bool {
        match self {
            Selector::SingleItem(wanted) | Selector::CountedSpecificItem { item: wanted, .. } => {
                wanted == item
            }
            Selector::CountedAnyInSet { products, .. }
            | Selector::GreedyAnyInSet(products)
            | Selector::CountedCheapestInSet { products, .. }
            | Selector::SingleInSet(products) => products.contains(item.product()),
        }
    }
}

/// Collect the first `count` candidates accepted by `accept`, or nothing if there are fewer.
fn take_exactly<'a>(
    items: &[Item<'a>],
    candidates: &[usize],
    count: usize,
    accept: impl Fn(&Item<'a>) -> bool,
) -> Selection {
    if count == 0 {
        return Selection::new();
    }

    let selected: Selection = candidates
        .iter()
        .copied()
        .filter(|&idx| items.get(idx).is_some_and(&accept))
        .take(count)
        .collect();

    if selected.len() < count {
        Selection::new()
    } else {
        selected
    }
}

/// Materialise the items at the selected positions.
pub fn selected_items<'a>(items: &[Item<'a>], selection: &[usize]) -> Vec<Item<'a>> {
    selection
        .iter()
        .filter_map(|&idx| items.get(idx).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};

    use crate::products::ProductId;

    use super::*;

    fn item<'a>(id: u32, price: i64) -> Item<'a> {
        Item::new(ProductId::new(id), Money::from_minor(price, GBP))
    }

    #[test]
    fn single_item_returns_first_occurrence() {
        let items = [item(2, 50), item(1, 100), item(1, 100)];

        let selector = Selector::SingleItem(item(1, 100));

        assert_eq!(selector.select(&items).as_slice(), &[1]);
    }

    #[test]
    fn single_item_requires_matching_price() {
        let items = [item(1, 90)];

        let selector = Selector::SingleItem(item(1, 100));

        assert!(selector.select(&items).is_empty());
    }

    #[test]
    fn counted_specific_item_is_all_or_nothing() {
        let items = [item(1, 100), item(2, 50), item(1, 100)];

        let two = Selector::CountedSpecificItem {
            item: item(1, 100),
            count: 2,
        };

        let three = Selector::CountedSpecificItem {
            item: item(1, 100),
            count: 3,
        };

        assert_eq!(two.select(&items).as_slice(), &[0, 2]);
        assert!(three.select(&items).is_empty());
    }

    #[test]
    fn counted_any_in_set_stops_at_count() {
        let items = [item(1, 100), item(3, 10), item(2, 50), item(1, 100)];

        let selector = Selector::CountedAnyInSet {
            products: ProductSet::from_ids(&[1, 2]),
            count: 2,
        };

        assert_eq!(selector.select(&items).as_slice(), &[0, 2]);
    }

    #[test]
    fn counted_any_in_set_rejects_short_input() {
        let items = [item(1, 100), item(3, 10)];

        let selector = Selector::CountedAnyInSet {
            products: ProductSet::from_ids(&[1, 2]),
            count: 2,
        };

        assert!(selector.select(&items).is_empty());
    }

    #[test]
    fn greedy_any_in_set_has_no_minimum() {
        let items = [item(1, 100), item(3, 10), item(2, 50)];

        let some = Selector::GreedyAnyInSet(ProductSet::from_ids(&[1, 2]));
        let none = Selector::GreedyAnyInSet(ProductSet::from_ids(&[9]));

        assert_eq!(some.select(&items).as_slice(), &[0, 2]);
        assert!(none.select(&items).is_empty());
    }

    #[test]
    fn counted_cheapest_in_set_picks_cheapest_first() {
        let items = [item(1, 300), item(2, 100), item(3, 50), item(1, 200)];

        let selector = Selector::CountedCheapestInSet {
            products: ProductSet::from_ids(&[1, 2]),
            count: 2,
        };

        assert_eq!(selector.select(&items).as_slice(), &[1, 3]);
    }

    #[test]
    fn counted_cheapest_in_set_ties_keep_input_order() {
        let items = [item(1, 100), item(2, 100), item(1, 100)];

        let selector = Selector::CountedCheapestInSet {
            products: ProductSet::from_ids(&[1, 2]),
            count: 2,
        };

        assert_eq!(selector.select(&items).as_slice(), &[0, 1]);
    }

    #[test]
    fn single_in_set_is_cheapest_one() {
        let items = [item(4, 80), item(5, 85), item(4, 79)];

        let selector = Selector::SingleInSet(ProductSet::from_ids(&[4, 5]));

        assert_eq!(selector.select(&items).as_slice(), &[2]);
    }

    #[test]
    fn select_among_only_considers_candidates() {
        let items = [item(1, 50), item(1, 100), item(1, 150)];

        let selector = Selector::SingleInSet(ProductSet::from_ids(&[1]));

        assert_eq!(selector.select_among(&items, &[1, 2]).as_slice(), &[1]);
    }

    #[test]
    fn zero_count_never_matches() {
        let items = [item(1, 50)];

        let selector = Selector::CountedAnyInSet {
            products: ProductSet::from_ids(&[1]),
            count: 0,
        };

        assert!(selector.select(&items).is_empty());
    }

    #[test]
    fn matches_ignores_quantity() {
        let counted = Selector::CountedSpecificItem {
            item: item(1, 100),
            count: 3,
        };

        assert!(counted.select(&[item(1, 100)]).is_empty());
        assert!(counted.matches(&item(1, 100)));
        assert!(!counted.matches(&item(1, 99)));

        let set = Selector::CountedCheapestInSet {
            products: ProductSet::from_ids(&[2]),
            count: 5,
        };

        assert!(set.matches(&item(2, 1)));
        assert!(!set.matches(&item(3, 1)));
    }

    #[test]
    fn selection_does_not_mutate_input() {
        let items = vec![item(1, 300), item(1, 100)];
        let before = items.clone();

        let selector = Selector::CountedCheapestInSet {
            products: ProductSet::from_ids(&[1]),
            count: 2,
        };

        let selection = selector.select(&items);

        assert_eq!(items, before);
        assert_eq!(
            selected_items(&items, &selection),
            vec![item(1, 100), item(1, 300)]
        );
    }
}
