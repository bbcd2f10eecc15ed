//! Products

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;
use smallvec::SmallVec;
use thiserror::Error;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Errors raised while building a product's purchase and sale units.
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    /// A purchase unit for the same supplier and measure already exists (supplier, measure).
    #[error("purchase unit for measure {1} from supplier {0:?} already exists")]
    DuplicatePurchaseUnit(Option<String>, String),

    /// A sale unit for the same measure already exists.
    #[error("sale unit for measure {0} already exists")]
    DuplicateSaleUnit(String),

    /// A unit price differs from the product currency (unit currency, product currency).
    #[error("unit is priced in {0}, but product is priced in {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Which sides of the business a product takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductKind {
    /// Bought in but never sold directly, e.g. cleaning supplies.
    PurchaseOnly,

    /// Sold but never bought in, e.g. a prepared dish.
    SaleOnly,

    /// Bought in and sold on, e.g. bottled drinks.
    PurchaseAndSale,
}

impl ProductKind {
    /// Whether the product has purchase units.
    pub fn supports_purchase(self) -> bool {
        matches!(self, ProductKind::PurchaseOnly | ProductKind::PurchaseAndSale)
    }

    /// Whether the product has sale units.
    pub fn supports_sale(self) -> bool {
        matches!(self, ProductKind::SaleOnly | ProductKind::PurchaseAndSale)
    }
}

/// A priced packaging option a product is bought in.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseUnit<'a> {
    /// Measure id
    pub measure: String,

    /// Number of measures bought at `price`
    pub quantity: Decimal,

    /// Price paid for `quantity` measures
    pub price: Money<'a, Currency>,

    /// Supplier id, if any
    pub supplier: Option<String>,
}

impl<'a> PurchaseUnit<'a> {
    /// Creates a purchase unit for one of `measure` at `price`.
    pub fn new(measure: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            measure: measure.into(),
            quantity: Decimal::ONE,
            price,
            supplier: None,
        }
    }

    /// Set the number of measures bought at this price.
    #[must_use]
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the supplier.
    #[must_use]
    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }
}

/// A priced option a product is sold in.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleUnit<'a> {
    /// Measure id
    pub measure: String,

    /// Number of measures sold at `price`
    pub quantity: Decimal,

    /// Sale price for `quantity` measures
    pub price: Money<'a, Currency>,
}

impl<'a> SaleUnit<'a> {
    /// Creates a sale unit for one of `measure` at `price`.
    pub fn new(measure: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            measure: measure.into(),
            quantity: Decimal::ONE,
            price,
        }
    }

    /// Set the number of measures sold at this price.
    #[must_use]
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    name: String,
    kind: ProductKind,
    currency: &'static Currency,
    purchase_units: SmallVec<[PurchaseUnit<'a>; 4]>,
    sale_units: SmallVec<[SaleUnit<'a>; 4]>,
    default_purchase_measure: Option<String>,
    default_sale_measure: Option<String>,
}

impl<'a> Product<'a> {
    /// Create a new product with no units.
    pub fn new(name: impl Into<String>, kind: ProductKind, currency: &'static Currency) -> Self {
        Product {
            name: name.into(),
            kind,
            currency,
            purchase_units: SmallVec::new(),
            sale_units: SmallVec::new(),
            default_purchase_measure: None,
            default_sale_measure: None,
        }
    }

    /// Add a purchase unit.
    ///
    /// # Errors
    ///
    /// - [`ProductError::DuplicatePurchaseUnit`]: a unit with the same supplier and measure exists.
    /// - [`ProductError::CurrencyMismatch`]: the unit is priced in another currency.
    pub fn add_purchase_unit(&mut self, unit: PurchaseUnit<'a>) -> Result<(), ProductError> {
        self.ensure_currency(&unit.price)?;

        let duplicate = self
            .purchase_units
            .iter()
            .any(|existing| existing.supplier == unit.supplier && existing.measure == unit.measure);

        if duplicate {
            return Err(ProductError::DuplicatePurchaseUnit(
                unit.supplier,
                unit.measure,
            ));
        }

        self.purchase_units.push(unit);

        Ok(())
    }

    /// Add a sale unit.
    ///
    /// # Errors
    ///
    /// - [`ProductError::DuplicateSaleUnit`]: a unit with the same measure exists.
    /// - [`ProductError::CurrencyMismatch`]: the unit is priced in another currency.
    pub fn add_sale_unit(&mut self, unit: SaleUnit<'a>) -> Result<(), ProductError> {
        self.ensure_currency(&unit.price)?;

        if self
            .sale_units
            .iter()
            .any(|existing| existing.measure == unit.measure)
        {
            return Err(ProductError::DuplicateSaleUnit(unit.measure));
        }

        self.sale_units.push(unit);

        Ok(())
    }

    /// Designate the measure used when costing purchases.
    pub fn set_default_purchase_measure(&mut self, measure: impl Into<String>) {
        self.default_purchase_measure = Some(measure.into());
    }

    /// Designate the measure used when costing sales.
    pub fn set_default_sale_measure(&mut self, measure: impl Into<String>) {
        self.default_sale_measure = Some(measure.into());
    }

    /// The purchase unit matching the default purchase measure.
    ///
    /// When several suppliers offer the default measure the first one added wins.
    pub fn default_purchase_unit(&self) -> Option<&PurchaseUnit<'a>> {
        let measure = self.default_purchase_measure.as_deref()?;

        self.purchase_units
            .iter()
            .find(|unit| unit.measure == measure)
    }

    /// The sale unit matching the default sale measure.
    pub fn default_sale_unit(&self) -> Option<&SaleUnit<'a>> {
        let measure = self.default_sale_measure.as_deref()?;

        self.sale_units.iter().find(|unit| unit.measure == measure)
    }

    /// Product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Product kind
    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    /// Currency all unit prices are expressed in
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Purchase units, in the order they were added
    pub fn purchase_units(&self) -> &[PurchaseUnit<'a>] {
        &self.purchase_units
    }

    /// Sale units, in the order they were added
    pub fn sale_units(&self) -> &[SaleUnit<'a>] {
        &self.sale_units
    }

    /// Default purchase measure id
    pub fn default_purchase_measure(&self) -> Option<&str> {
        self.default_purchase_measure.as_deref()
    }

    /// Default sale measure id
    pub fn default_sale_measure(&self) -> Option<&str> {
        self.default_sale_measure.as_deref()
    }

    fn ensure_currency(&self, price: &Money<'_, Currency>) -> Result<(), ProductError> {
        let unit_currency = price.currency();

        if unit_currency == self.currency {
            Ok(())
        } else {
            Err(ProductError::CurrencyMismatch(
                unit_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ))
        }
    }
}
