//! Fixtures
//!
//! Measure and product sets loaded from YAML, e.g. `fixtures/measures/kitchen.yml`
//! and `fixtures/products/kitchen.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::info;

use crate::{
    fixtures::{measures::MeasuresFixture, products::ProductsFixture},
    measures::{Measure, MeasureError, MeasureRegistry},
    products::{Product, ProductError, ProductKey},
};

pub mod measures;
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

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No priced units loaded yet
    #[error("No priced products loaded yet; currency unknown")]
    NoCurrency,

    /// Measure not found
    #[error("Measure not found: {0}")]
    MeasureNotFound(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A product refers to a measure that has not been loaded
    #[error("Product {product} refers to unknown measure {measure}")]
    UnknownMeasure {
        /// Product key
        product: String,
        /// Measure id
        measure: String,
    },

    /// Invalid measure definition
    #[error(transparent)]
    Measure(#[from] MeasureError),

    /// Invalid product definition
    #[error(transparent)]
    Product(#[from] ProductError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded measures
    measures: MeasureRegistry,

    /// Products stored with generated keys, and string key -> `SlotMap` key mappings
    products: SlotMap<ProductKey, Product<'static>>,
    product_keys: FxHashMap<String, ProductKey>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            measures: MeasureRegistry::new(),
            products: SlotMap::with_key(),
            product_keys: FxHashMap::default(),
            currency: None,
        }
    }

    /// Load measures from a YAML fixture file
    ///
    /// Measures are registered in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a measure is
    /// invalid, or if an id is already loaded.
    #[tracing::instrument(skip(self), fields(base_path = %self.base_path.display()))]
    pub fn load_measures(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("measures").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: MeasuresFixture = serde_norway::from_str(&contents)?;

        let mut entries: Vec<_> = fixture.measures.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        let count = entries.len();

        for (id, measure_fixture) in entries {
            self.measures.insert(measure_fixture.into_measure(id)?)?;
        }

        info!(count, "loaded measures");

        Ok(self)
    }

    /// Load products from a YAML fixture file
    ///
    /// Measures must be loaded first; products are stored in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a product
    /// refers to an unknown measure, breaks a product invariant, or is priced
    /// in a different currency from the rest of the set.
    #[tracing::instrument(skip(self), fields(base_path = %self.base_path.display()))]
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        let mut entries: Vec<_> = fixture.products.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        let count = entries.len();

        for (key, product_fixture) in entries {
            let currency = match (product_fixture.currency()?, self.currency) {
                (Some(currency), Some(existing)) if currency != existing => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
                (Some(currency), _) => currency,
                (None, Some(existing)) => existing,
                (None, None) => return Err(FixtureError::NoCurrency),
            };

            self.currency = Some(currency);

            let product = product_fixture.try_into_product(&key, currency, &self.measures)?;
            let product_key = self.products.insert(product);

            self.product_keys.insert(key, product_key);
        }

        info!(count, "loaded products");

        Ok(self)
    }

    /// Load a complete fixture set (measures and products with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture.load_measures(name)?.load_products(name)?;

        Ok(fixture)
    }

    /// Get a measure by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the measure is not found.
    pub fn measure(&self, id: &str) -> Result<&Measure, FixtureError> {
        self.measures
            .get(id)
            .ok_or_else(|| FixtureError::MeasureNotFound(id.to_string()))
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product<'static>, FixtureError> {
        let product_key = self.product_key(key)?;

        self.products
            .get(product_key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a product key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, key: &str) -> Result<ProductKey, FixtureError> {
        self.product_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get the loaded measures
    pub fn measures(&self) -> &MeasureRegistry {
        &self.measures
    }

    /// Iterate over the loaded products in key order
    pub fn products(&self) -> impl Iterator<Item = &Product<'static>> {
        self.products.values()
    }

    /// Get the product `SlotMap`
    pub fn product_map(&self) -> &SlotMap<ProductKey, Product<'static>> {
        &self.products
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no priced products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rust_decimal::Decimal;
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    const MEASURES: &str = "measures:\n  bag:\n    name: 1 kg bag\n    unit: kg\n    quantity: 1\n  portion:\n    name: 100 g portion\n    unit: g\n    quantity: 100\n";

    #[test]
    fn fixture_loads_measures_and_products() -> TestResult {
        let fixture = Fixture::from_set("kitchen")?;

        assert!(!fixture.measures().is_empty());
        assert!(fixture.products().count() > 0);
        assert_eq!(fixture.currency()?, GBP);

        let flour = fixture.product("flour")?;

        assert_eq!(flour.name(), "Plain flour");
        assert_eq!(fixture.measure("flour-bag")?.unit(), "kg");

        Ok(())
    }

    #[test]
    fn measures_are_registered_in_id_order() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "measures", "small", MEASURES)?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_measures("small")?;

        let ids: Vec<&str> = fixture.measures().iter().map(Measure::id).collect();

        assert_eq!(ids, vec!["bag", "portion"]);
        assert_eq!(fixture.measure("portion")?.quantity(), Decimal::from(100));

        Ok(())
    }

    #[test]
    fn fixture_measure_not_found_returns_error() {
        let fixture = Fixture::new();

        assert!(matches!(
            fixture.measure("missing"),
            Err(FixtureError::MeasureNotFound(_))
        ));
    }

    #[test]
    fn fixture_product_not_found_returns_error() {
        let fixture = Fixture::new();

        assert!(matches!(
            fixture.product("nonexistent"),
            Err(FixtureError::ProductNotFound(_))
        ));
        assert!(matches!(
            fixture.product_key("nonexistent"),
            Err(FixtureError::ProductNotFound(_))
        ));
    }

    #[test]
    fn fixture_no_currency_returns_error() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.currency(), Err(FixtureError::NoCurrency)));
    }

    #[test]
    fn fixture_load_products_rejects_currency_mismatch() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "measures", "mixed", MEASURES)?;
        write_fixture(
            dir.path(),
            "products",
            "mixed",
            "products:\n  a-flour:\n    name: Flour\n    kind: purchase-only\n    purchase:\n      units:\n        - measure: bag\n          price: 1.00 GBP\n  b-sugar:\n    name: Sugar\n    kind: purchase-only\n    purchase:\n      units:\n        - measure: bag\n          price: 1.00 USD\n",
        )?;

        let result = Fixture::from_set_in(dir.path(), "mixed");

        assert!(matches!(
            result,
            Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "GBP" && found == "USD"
        ));

        Ok(())
    }

    #[test]
    fn fixture_load_products_rejects_duplicate_sale_units() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "measures", "dupes", MEASURES)?;
        write_fixture(
            dir.path(),
            "products",
            "dupes",
            "products:\n  bread:\n    name: Bread\n    kind: sale-only\n    sale:\n      units:\n        - measure: portion\n          price: 1.00 GBP\n        - measure: portion\n          price: 1.20 GBP\n",
        )?;

        let result = Fixture::from_set_in(dir.path(), "dupes");

        assert!(matches!(
            result,
            Err(FixtureError::Product(ProductError::DuplicateSaleUnit(measure))) if measure == "portion"
        ));

        Ok(())
    }

    #[test]
    fn fixture_unpriced_first_product_has_no_currency() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "measures", "bare", MEASURES)?;
        write_fixture(
            dir.path(),
            "products",
            "bare",
            "products:\n  napkins:\n    name: Napkins\n    kind: purchase-only\n",
        )?;

        let result = Fixture::from_set_in(dir.path(), "bare");

        assert!(matches!(result, Err(FixtureError::NoCurrency)));

        Ok(())
    }

    #[test]
    fn fixture_missing_file_returns_io_error() {
        let result = Fixture::from_set("does-not-exist");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }
}
