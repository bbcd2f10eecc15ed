//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    measures::MeasureRegistry,
    products::{Product, ProductKind, PurchaseUnit, SaleUnit},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product kind (`purchase-only`, `sale-only` or `purchase-and-sale`)
    pub kind: ProductKind,

    /// Purchase side
    #[serde(default)]
    pub purchase: SideFixture<PurchaseUnitFixture>,

    /// Sale side
    #[serde(default)]
    pub sale: SideFixture<SaleUnitFixture>,
}

/// Units and default measure for one side of a product
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "U: Deserialize<'de>"))]
pub struct SideFixture<U> {
    /// Default measure id
    #[serde(default)]
    pub default_measure: Option<String>,

    /// Priced units
    #[serde(default)]
    pub units: Vec<U>,
}

impl<U> Default for SideFixture<U> {
    fn default() -> Self {
        Self {
            default_measure: None,
            units: Vec::new(),
        }
    }
}

/// Purchase Unit Fixture
#[derive(Debug, Deserialize)]
pub struct PurchaseUnitFixture {
    /// Measure id
    pub measure: String,

    /// Number of measures bought at `price`
    #[serde(default = "one")]
    pub quantity: Decimal,

    /// Price (e.g., "10.00 GBP")
    pub price: String,

    /// Supplier id
    #[serde(default)]
    pub supplier: Option<String>,
}

/// Sale Unit Fixture
#[derive(Debug, Deserialize)]
pub struct SaleUnitFixture {
    /// Measure id
    pub measure: String,

    /// Number of measures sold at `price`
    #[serde(default = "one")]
    pub quantity: Decimal,

    /// Price (e.g., "2.00 GBP")
    pub price: String,
}

fn one() -> Decimal {
    Decimal::ONE
}

impl ProductFixture {
    /// Currency of the first priced unit, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if that price cannot be parsed.
    pub fn currency(&self) -> Result<Option<&'static Currency>, FixtureError> {
        let first_price = self
            .purchase
            .units
            .iter()
            .map(|unit| unit.price.as_str())
            .chain(self.sale.units.iter().map(|unit| unit.price.as_str()))
            .next();

        first_price
            .map(|price| parse_price(price).map(|(_minor, currency)| currency))
            .transpose()
    }

    /// Build the product, checking every measure it names against `measures`.
    ///
    /// # Errors
    ///
    /// - [`FixtureError::UnknownMeasure`]: a unit or default names an unregistered measure.
    /// - [`FixtureError::InvalidPrice`] / [`FixtureError::UnknownCurrency`]: a price cannot be parsed.
    /// - [`FixtureError::Product`]: a unit breaks a product invariant.
    pub fn try_into_product(
        self,
        key: &str,
        currency: &'static Currency,
        measures: &MeasureRegistry,
    ) -> Result<Product<'static>, FixtureError> {
        let ensure_measure = |measure: &str| {
            if measures.contains(measure) {
                Ok(())
            } else {
                Err(FixtureError::UnknownMeasure {
                    product: key.to_string(),
                    measure: measure.to_string(),
                })
            }
        };

        let mut product = Product::new(self.name, self.kind, currency);

        for unit in self.purchase.units {
            ensure_measure(&unit.measure)?;

            let mut purchase = PurchaseUnit::new(unit.measure, money(&unit.price)?)
                .with_quantity(unit.quantity);
            purchase.supplier = unit.supplier;

            product.add_purchase_unit(purchase)?;
        }

        for unit in self.sale.units {
            ensure_measure(&unit.measure)?;

            product.add_sale_unit(
                SaleUnit::new(unit.measure, money(&unit.price)?).with_quantity(unit.quantity),
            )?;
        }

        if let Some(measure) = self.purchase.default_measure {
            ensure_measure(&measure)?;
            product.set_default_purchase_measure(measure);
        }

        if let Some(measure) = self.sale.default_measure {
            ensure_measure(&measure)?;
            product.set_default_sale_measure(measure);
        }

        Ok(product)
    }
}

fn money(price: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(price)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = match currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}
