//! Deal Fixtures
//!
//! Deals reference products by their fixture key. Encoded deals use the text encoding and
//! refer to products by id instead.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    deals::{
        CheapestFreeInSetDeal, CompositeDeal, Deal, DealClause, DealKey, QuantityThresholdDeal,
        encoding,
    },
    fixtures::{FixtureError, products::parse_price},
    items::Item,
    products::{Product, ProductSet},
    selectors::Selector,
};

/// Wrapper for deals in YAML
///
/// Deals are kept in key order, which is also the order the solver receives them in.
#[derive(Debug, Deserialize)]
pub struct DealsFixture {
    /// Map of deal key -> deal fixture
    pub deals: BTreeMap<String, DealFixture>,
}

/// A product and how many of it
#[derive(Debug, Deserialize)]
pub struct ProductCountFixture {
    /// Product key
    pub product: String,

    /// Quantity
    pub count: usize,
}

/// Deal fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DealFixture {
    /// Buy A of X, get B of Y for Z each
    QuantityThreshold {
        /// Display name override
        #[serde(default)]
        name: Option<String>,

        /// Qualifying product and quantity
        buy: ProductCountFixture,

        /// Repriced product and quantity
        get: ProductCountFixture,

        /// Unit price of the repriced items (e.g., "0.22 GBP")
        price: String,
    },

    /// Buy N from a set, cheapest is free
    CheapestFreeInSet {
        /// Display name override
        #[serde(default)]
        name: Option<String>,

        /// Product keys in the set
        products: Vec<String>,

        /// Items per application
        count: usize,
    },

    /// Clause-composed deal
    Composite {
        /// Display name override
        #[serde(default)]
        name: Option<String>,

        /// Clauses, evaluated in order
        clauses: Vec<ClauseFixture>,
    },

    /// Deal in its text encoding
    Encoded {
        /// Display name override
        #[serde(default)]
        name: Option<String>,

        /// Encoded deal line (e.g., "1 3 1 1 2 22")
        line: String,
    },
}

/// Composite deal clause fixture
#[derive(Debug, Deserialize)]
pub struct ClauseFixture {
    /// Items that qualify the clause
    pub selection: SelectorFixture,

    /// Items repriced by the clause
    pub target: SelectorFixture,

    /// Unit price for every target item
    pub price: String,

    /// Whether the clause may be skipped
    #[serde(default)]
    pub optional: bool,
}

/// Selector fixture
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectorFixture {
    /// The first occurrence of a product
    SingleItem {
        /// Product key
        product: String,
    },

    /// Exactly `count` occurrences of a product
    CountedSpecificItem {
        /// Product key
        product: String,

        /// Required occurrences
        count: usize,
    },

    /// Exactly `count` items from the set, in basket order
    CountedAnyInSet {
        /// Product keys
        products: Vec<String>,

        /// Required items
        count: usize,
    },

    /// Every item from the set
    GreedyAnyInSet {
        /// Product keys
        products: Vec<String>,
    },

    /// The `count` cheapest items from the set
    CountedCheapestInSet {
        /// Product keys
        products: Vec<String>,

        /// Required items
        count: usize,
    },

    /// The cheapest item from the set
    SingleInSet {
        /// Product keys
        products: Vec<String>,
    },
}

/// Products and currency deal fixtures are resolved against
#[derive(Debug, Clone, Copy)]
pub struct DealContext<'f, 'a> {
    /// Loaded products by fixture key
    pub products: &'f FxHashMap<String, Product<'a>>,

    /// Currency of the fixture set
    pub currency: &'static Currency,
}

impl<'a> DealContext<'_, 'a> {
    fn product(&self, key: &str) -> Result<&Product<'a>, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    fn item(&self, key: &str) -> Result<Item<'a>, FixtureError> {
        let product = self.product(key)?;

        Ok(Item::with_name(product.id, product.price, product.name.clone()))
    }

    fn product_set(&self, keys: &[String]) -> Result<ProductSet, FixtureError> {
        keys.iter()
            .map(|key| self.product(key).map(|product| product.id))
            .collect()
    }

    fn price(&self, s: &str) -> Result<Money<'a, Currency>, FixtureError> {
        let (minor_units, currency) = parse_price(s)?;

        if currency != self.currency {
            return Err(FixtureError::CurrencyMismatch(
                self.currency.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            ));
        }

        Ok(Money::from_minor(minor_units, currency))
    }
}

impl DealFixture {
    /// Convert to a [`Deal`] with the given key
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced product is unknown, a price is invalid or in another
    /// currency, or an encoded line cannot be decoded.
    pub fn try_into_deal<'a>(
        self,
        key: DealKey,
        context: DealContext<'_, 'a>,
    ) -> Result<Deal<'a>, FixtureError> {
        let (deal, name) = match self {
            DealFixture::QuantityThreshold {
                name,
                buy,
                get,
                price,
            } => {
                let deal = QuantityThresholdDeal::new(
                    key,
                    buy.count,
                    context.product(&buy.product)?.id,
                    get.count,
                    context.product(&get.product)?.id,
                    context.price(&price)?,
                );

                (Deal::from(deal), name)
            }
            DealFixture::CheapestFreeInSet {
                name,
                products,
                count,
            } => {
                let deal = CheapestFreeInSetDeal::new(key, context.product_set(&products)?, count);

                (Deal::from(deal), name)
            }
            DealFixture::Composite { name, clauses } => {
                let clauses = clauses
                    .into_iter()
                    .map(|clause| clause.try_into_clause(context))
                    .collect::<Result<Vec<_>, _>>()?;

                (Deal::from(CompositeDeal::new(key, clauses)), name)
            }
            DealFixture::Encoded { name, line } => {
                (encoding::decode(&line, key, context.currency)?, name)
            }
        };

        Ok(match name {
            Some(name) => with_name(deal, name),
            None => deal,
        })
    }
}

fn with_name(deal: Deal<'_>, name: String) -> Deal<'_> {
    match deal {
        Deal::QuantityThreshold(deal) => Deal::QuantityThreshold(deal.with_name(name)),
        Deal::CheapestFreeInSet(deal) => Deal::CheapestFreeInSet(deal.with_name(name)),
        Deal::Composite(deal) => Deal::Composite(deal.with_name(name)),
    }
}

impl ClauseFixture {
    fn try_into_clause<'a>(
        self,
        context: DealContext<'_, 'a>,
    ) -> Result<DealClause<'a>, FixtureError> {
        let selection = self.selection.try_into_selector(context)?;
        let target = self.target.try_into_selector(context)?;
        let price = context.price(&self.price)?;

        Ok(if self.optional {
            DealClause::optional(selection, target, price)
        } else {
            DealClause::strict(selection, target, price)
        })
    }
}

impl SelectorFixture {
    fn try_into_selector<'a>(
        self,
        context: DealContext<'_, 'a>,
    ) -> Result<Selector<'a>, FixtureError> {
        Ok(match self {
            SelectorFixture::SingleItem { product } => Selector::SingleItem(context.item(&product)?),
            SelectorFixture::CountedSpecificItem { product, count } => {
                Selector::CountedSpecificItem {
                    item: context.item(&product)?,
                    count,
                }
            }
            SelectorFixture::CountedAnyInSet { products, count } => Selector::CountedAnyInSet {
                products: context.product_set(&products)?,
                count,
            },
            SelectorFixture::GreedyAnyInSet { products } => {
                Selector::GreedyAnyInSet(context.product_set(&products)?)
            }
            SelectorFixture::CountedCheapestInSet { products, count } => {
                Selector::CountedCheapestInSet {
                    products: context.product_set(&products)?,
                    count,
                }
            }
            SelectorFixture::SingleInSet { products } => {
                Selector::SingleInSet(context.product_set(&products)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::products::ProductId;

    use super::*;

    fn products() -> FxHashMap<String, Product<'static>> {
        let mut products = FxHashMap::default();

        for (key, id, name, price) in [
            ("sandwich", 1, "Sandwich", 100),
            ("cola", 2, "Cola", 200),
            ("crisps", 3, "Crisps", 101),
        ] {
            products.insert(
                key.to_string(),
                Product {
                    id: ProductId::new(id),
                    name: name.to_string(),
                    price: Money::from_minor(price, GBP),
                },
            );
        }

        products
    }

    fn convert(yaml: &str) -> Result<Deal<'static>, FixtureError> {
        let products = products();
        let fixture: DealFixture = serde_norway::from_str(yaml)?;

        fixture.try_into_deal(
            DealKey::default(),
            DealContext {
                products: &products,
                currency: GBP,
            },
        )
    }

    #[test]
    fn quantity_threshold_resolves_product_keys() -> TestResult {
        let deal = convert(
            r"
type: quantity_threshold
buy: { product: sandwich, count: 3 }
get: { product: cola, count: 1 }
price: 0.22 GBP
",
        )?;

        assert_eq!(encoding::encode(&deal)?, "1 3 1 1 2 22");

        Ok(())
    }

    #[test]
    fn cheapest_free_uses_name_override() -> TestResult {
        let deal = convert(
            r"
type: cheapest_free_in_set
name: Crisps BOGOF
products: [crisps, sandwich]
count: 2
",
        )?;

        assert_eq!(deal.name(), "Crisps BOGOF");
        assert_eq!(encoding::encode(&deal)?, "0 2 1 3");

        Ok(())
    }

    #[test]
    fn composite_builds_strict_and_optional_clauses() -> TestResult {
        let deal = convert(
            r"
type: composite
name: Meal Deal
clauses:
  - selection: { type: single_in_set, products: [sandwich] }
    target: { type: single_in_set, products: [sandwich] }
    price: 1.00 GBP
  - selection: { type: single_item, product: crisps }
    target: { type: counted_specific_item, product: crisps, count: 1 }
    price: 0.50 GBP
    optional: true
",
        )?;

        let Deal::Composite(composite) = &deal else {
            panic!("expected a composite deal");
        };

        assert_eq!(deal.name(), "Meal Deal");
        assert_eq!(composite.clauses().len(), 2);
        assert!(composite.clauses().first().is_some_and(DealClause::is_strict));
        assert!(!composite.clauses().get(1).is_some_and(DealClause::is_strict));

        Ok(())
    }

    #[test]
    fn encoded_deal_is_decoded() -> TestResult {
        let deal = convert(
            r#"
type: encoded
name: Cola offer
line: "1 3 1 1 2 22"
"#,
        )?;

        assert_eq!(deal.name(), "Cola offer");
        assert!(matches!(deal, Deal::QuantityThreshold(_)));

        Ok(())
    }

    #[test]
    fn malformed_encoded_deal_is_rejected() {
        let result = convert(
            r#"
type: encoded
line: "1 3 1"
"#,
        );

        assert!(matches!(result, Err(FixtureError::DealEncoding(_))));
    }

    #[test]
    fn unknown_product_is_rejected() {
        let result = convert(
            r"
type: cheapest_free_in_set
products: [pizza]
count: 2
",
        );

        assert!(matches!(result, Err(FixtureError::ProductNotFound(key)) if key == "pizza"));
    }

    #[test]
    fn price_in_other_currency_is_rejected() {
        let context_products = products();
        let context = DealContext {
            products: &context_products,
            currency: USD,
        };

        let result = context.price("1.00 GBP");

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn unknown_deal_type_is_rejected() {
        let result: Result<DealFixture, _> = serde_norway::from_str("type: half_price\n");

        assert!(result.is_err());
    }
}
