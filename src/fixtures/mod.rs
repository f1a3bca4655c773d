//! Fixtures
//!
//! A fixture set is three YAML files sharing a name under a base directory:
//! `products/<set>.yml`, `items/<set>.yml` and `deals/<set>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    basket::Basket,
    deals::{Deal, DealKey, encoding::DealEncodingError},
    fixtures::{
        deals::{DealContext, DealsFixture},
        items::ItemsFixture,
        products::ProductsFixture,
    },
    items::Item,
    products::Product,
};

pub mod deals;
pub mod items;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Deal not found
    #[error("Deal not found: {0}")]
    DealNotFound(String),

    /// Encoded deal could not be decoded
    #[error(transparent)]
    DealEncoding(#[from] DealEncodingError),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// No items loaded
    #[error("No items loaded; cannot create basket")]
    NoItems,

    /// Not enough items in fixture
    #[error("Not enough items in fixture, available: {available}, requested: {requested}")]
    NotEnoughItems {
        /// Number of items defined in the fixture
        available: usize,
        /// Number of items requested
        requested: usize,
    },

    /// Basket creation error
    #[error("Failed to create basket: {0}")]
    Basket(#[from] crate::basket::BasketError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products by fixture key
    products: FxHashMap<String, Product<'a>>,

    /// Fixture key of every loaded deal
    deal_names: SlotMap<DealKey, String>,

    /// Fixture key -> deal key
    deal_keys: FxHashMap<String, DealKey>,

    /// Pre-built items, in basket order
    items: Vec<Item<'a>>,

    /// Pre-built deals, in fixture key order
    deals: Vec<Deal<'a>>,

    /// Currency for the fixture set
    currency: Option<&'static rusty_money::iso::Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
            deal_names: SlotMap::with_key(),
            deal_keys: FxHashMap::default(),
            items: Vec::new(),
            deals: Vec::new(),
            currency: None,
        }
    }

    fn read(&self, category: &str, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(category).join(format!("{name}.yml"));

        debug!(path = %file_path.display(), "reading fixture");

        Ok(fs::read_to_string(&file_path)?)
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = serde_norway::from_str(&self.read("products", name)?)?;

        for (key, product_fixture) in fixture.products {
            // Parse to get currency first (before creating Product)
            let (_minor_units, currency) = products::parse_price(&product_fixture.price)?;

            // Validate currency consistency
            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            let product: Product<'a> = product_fixture.try_into()?;

            self.products.insert(key, product);
        }

        Ok(self)
    }

    /// Load items from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if referenced products don't exist.
    pub fn load_items(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ItemsFixture = serde_norway::from_str(&self.read("items", name)?)?;

        for product_key in fixture.items {
            let product = self.product(&product_key)?;

            let item = Item::with_name(product.id, product.price, product.name.clone());

            self.items.push(item);
        }

        Ok(self)
    }

    /// Load deals from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a deal refers to an unknown
    /// product, or if a deal price is in another currency.
    pub fn load_deals(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: DealsFixture = serde_norway::from_str(&self.read("deals", name)?)?;
        let currency = self.currency()?;

        for (key, deal_fixture) in fixture.deals {
            let deal_key = self.deal_names.insert(key.clone());

            let context = DealContext {
                products: &self.products,
                currency,
            };

            let deal = deal_fixture.try_into_deal(deal_key, context)?;

            debug!(deal = %key, name = %deal.name(), "loaded deal");

            self.deals.push(deal);
            self.deal_keys.insert(key, deal_key);
        }

        Ok(self)
    }

    /// Load a complete fixture set (products, items, and deals with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_products(name)?
            .load_items(name)?
            .load_deals(name)?;

        Ok(fixture)
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product<'a>, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a deal by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the deal is not found.
    pub fn deal(&self, key: &str) -> Result<&Deal<'a>, FixtureError> {
        let deal_key = self
            .deal_keys
            .get(key)
            .ok_or_else(|| FixtureError::DealNotFound(key.to_string()))?;

        self.deals
            .iter()
            .find(|deal| deal.key() == *deal_key)
            .ok_or_else(|| FixtureError::DealNotFound(key.to_string()))
    }

    /// Get the fixture key a deal was loaded from
    pub fn deal_name(&self, key: DealKey) -> Option<&str> {
        self.deal_names.get(key).map(String::as_str)
    }

    /// Get all items
    pub fn items(&self) -> &[Item<'a>] {
        &self.items
    }

    /// Get all deals
    pub fn deals(&self) -> &[Deal<'a>] {
        &self.deals
    }

    /// Create a basket from the loaded items
    ///
    /// # Errors
    ///
    /// Returns an error if no items are loaded or if basket creation fails.
    pub fn basket(&self, n: Option<usize>) -> Result<Basket<'a>, FixtureError> {
        let currency = self.currency()?;

        if self.items.is_empty() {
            return Err(FixtureError::NoItems);
        }

        if let Some(n) = n
            && n > self.items.len()
        {
            return Err(FixtureError::NotEnoughItems {
                requested: n,
                available: self.items.len(),
            });
        }

        let items: Vec<Item<'a>> = self
            .items
            .iter()
            .take(n.unwrap_or(self.items.len()))
            .cloned()
            .collect();

        Ok(Basket::with_items(items, currency)?)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static rusty_money::iso::Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
