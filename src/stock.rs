//! Stock counts

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::warn;

use crate::{
    conversion::{BaseQuantity, to_base},
    costing::price_per_base_unit,
    measures::MeasureRegistry,
    products::Product,
    units::ConversionGroup,
};

/// Errors that can occur while valuing a stock count.
#[derive(Debug, Error, PartialEq)]
pub enum StockError {
    /// The stock value could not be represented in minor units.
    #[error("stock value {0} does not fit in minor units")]
    ValueOverflow(Decimal),
}

/// A single counted line, e.g. "3 cases".
#[derive(Debug, Clone, PartialEq)]
pub struct StockEntry {
    /// Measure id
    pub measure: String,

    /// Number of measures counted
    pub quantity: Decimal,
}

impl StockEntry {
    /// Create an entry for `quantity` of `measure`.
    pub fn new(measure: impl Into<String>, quantity: Decimal) -> Self {
        StockEntry {
            measure: measure.into(),
            quantity,
        }
    }
}

/// The counted stock of one product, possibly across several measures.
#[derive(Debug, Clone, Default)]
pub struct StockCount {
    entries: SmallVec<[StockEntry; 8]>,
}

impl StockCount {
    /// Create an empty stock count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stock count from entries.
    pub fn with_entries(entries: impl IntoIterator<Item = StockEntry>) -> Self {
        StockCount {
            entries: entries.into_iter().collect(),
        }
    }

    /// Record `quantity` of `measure`.
    pub fn push(&mut self, measure: impl Into<String>, quantity: Decimal) {
        self.entries.push(StockEntry::new(measure, quantity));
    }

    /// Counted entries
    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    /// Total counted quantity in the base unit of `group`.
    ///
    /// Entries whose measure is unknown or belongs to another group cannot be
    /// added to the total and are skipped.
    pub fn total(&self, measures: &MeasureRegistry, group: &ConversionGroup) -> BaseQuantity {
        let total_quantity = self
            .entries
            .iter()
            .filter_map(|entry| {
                let converted = to_base(measures, &entry.measure, entry.quantity);

                if converted.unit.as_ref() == Some(group) {
                    Some(converted.total_quantity)
                } else {
                    warn!(
                        measure = %entry.measure,
                        expected = %group,
                        "skipping stock entry outside the counted unit group"
                    );
                    None
                }
            })
            .fold(Decimal::ZERO, Decimal::saturating_add);

        BaseQuantity {
            total_quantity,
            unit: Some(group.clone()),
        }
    }

    /// Value of the counted stock at the product's purchase cost.
    ///
    /// Stock is totalled in the group of the default purchase measure and
    /// priced per base unit of the default purchase unit, so purchase-only
    /// products are valued too. A product without a resolvable default
    /// purchase unit is valued at zero.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::ValueOverflow`] if the value cannot be expressed in minor units.
    pub fn value(
        &self,
        product: &Product<'_>,
        measures: &MeasureRegistry,
    ) -> Result<Money<'static, Currency>, StockError> {
        let currency = product.currency();

        let Some((purchase, measure)) = product
            .default_purchase_unit()
            .and_then(|unit| measures.get(&unit.measure).map(|measure| (unit, measure)))
        else {
            return Ok(Money::from_minor(0, currency));
        };

        let cost = price_per_base_unit(
            measures,
            &purchase.measure,
            purchase.quantity,
            &purchase.price,
        );
        let total = self.total(measures, &measure.group()).total_quantity;

        Ok(Money::from_minor(
            to_minor_units(total.saturating_mul(cost), currency)?,
            currency,
        ))
    }
}

/// Round a major-unit amount to the currency's minor units.
fn to_minor_units(value: Decimal, currency: &Currency) -> Result<i64, StockError> {
    let scale = Decimal::from(10_i64.pow(currency.exponent));

    value
        .round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(scale)
        .and_then(|minor| minor.to_i64())
        .ok_or(StockError::ValueOverflow(value))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{
        measures::Measure,
        products::{ProductKind, PurchaseUnit, SaleUnit},
    };

    use super::*;

    fn measures() -> Result<MeasureRegistry, crate::measures::MeasureError> {
        MeasureRegistry::with_measures([
            Measure::new("sack", "16 kg sack", "kg", Decimal::from(16))?,
            Measure::new("bag", "1.5 kg bag", "kg", Decimal::new(15, 1))?,
            Measure::new("portion", "100 g portion", "g", Decimal::from(100))?,
            Measure::new("tub", "Tub", "each", Decimal::ONE)?,
        ])
    }

    fn rice() -> Result<Product<'static>, crate::products::ProductError> {
        let mut product = Product::new("Basmati rice", ProductKind::PurchaseAndSale, GBP);

        product.add_purchase_unit(PurchaseUnit::new("sack", Money::from_minor(3_200, GBP)))?;
        product.add_sale_unit(SaleUnit::new("portion", Money::from_minor(150, GBP)))?;
        product.set_default_purchase_measure("sack");
        product.set_default_sale_measure("portion");

        Ok(product)
    }

    #[test]
    fn total_sums_entries_in_base_units() -> TestResult {
        let measures = measures()?;
        let mut count = StockCount::new();

        count.push("sack", Decimal::TWO);
        count.push("bag", Decimal::ONE);
        count.push("portion", Decimal::from(5));

        let total = count.total(&measures, &ConversionGroup::Grams);

        assert_eq!(total.total_quantity, Decimal::from(34_000));
        assert_eq!(total.unit, Some(ConversionGroup::Grams));

        Ok(())
    }

    #[test]
    fn total_skips_incompatible_and_unknown_entries() -> TestResult {
        let measures = measures()?;
        let count = StockCount::with_entries([
            StockEntry {
                measure: "sack".to_string(),
                quantity: Decimal::ONE,
            },
            StockEntry {
                measure: "tub".to_string(),
                quantity: Decimal::from(4),
            },
            StockEntry {
                measure: "barrel".to_string(),
                quantity: Decimal::from(9),
            },
        ]);

        let total = count.total(&measures, &ConversionGroup::Grams);

        assert_eq!(total.total_quantity, Decimal::from(16_000));
        assert_eq!(count.entries().len(), 3);

        Ok(())
    }

    #[test]
    fn value_reports_amounts_beyond_minor_units() -> TestResult {
        let measures = measures()?;
        let product = rice()?;
        let mut count = StockCount::new();

        count.push("sack", Decimal::MAX);

        assert!(matches!(
            count.value(&product, &measures),
            Err(StockError::ValueOverflow(_))
        ));

        Ok(())
    }

    #[test]
    fn value_prices_stock_at_purchase_cost() -> TestResult {
        let measures = measures()?;
        let product = rice()?;
        let mut count = StockCount::new();

        // 1.5 sacks + one 1.5 kg bag = 25,500 g at £0.002/g
        count.push("sack", Decimal::new(15, 1));
        count.push("bag", Decimal::ONE);

        assert_eq!(
            count.value(&product, &measures)?,
            Money::from_minor(5_100, GBP)
        );

        Ok(())
    }

    #[test]
    fn value_rounds_to_minor_units() -> TestResult {
        let measures = measures()?;
        let mut product = Product::new("Saffron", ProductKind::PurchaseAndSale, GBP);

        product.add_purchase_unit(
            PurchaseUnit::new("portion", Money::from_minor(1_000, GBP))
                .with_quantity(Decimal::from(3)),
        )?;
        product.add_sale_unit(SaleUnit::new("portion", Money::from_minor(1_000, GBP)))?;
        product.set_default_purchase_measure("portion");
        product.set_default_sale_measure("portion");

        let count = StockCount::with_entries([StockEntry {
            measure: "portion".to_string(),
            quantity: Decimal::ONE,
        }]);

        // 100 g at £10/300 g = £3.333...
        assert_eq!(
            count.value(&product, &measures)?,
            Money::from_minor(333, GBP)
        );

        Ok(())
    }

    #[test]
    fn value_covers_purchase_only_products() -> TestResult {
        let measures = measures()?;
        let mut product = Product::new("Deli tubs", ProductKind::PurchaseOnly, GBP);

        product.add_purchase_unit(
            PurchaseUnit::new("tub", Money::from_minor(1_250, GBP)).with_quantity(Decimal::from(50)),
        )?;
        product.set_default_purchase_measure("tub");

        let count = StockCount::with_entries([StockEntry {
            measure: "tub".to_string(),
            quantity: Decimal::from(120),
        }]);

        assert_eq!(
            count.value(&product, &measures)?,
            Money::from_minor(3_000, GBP)
        );

        Ok(())
    }

    #[test]
    fn value_without_default_purchase_measure_is_zero() -> TestResult {
        let measures = measures()?;
        let product = Product::new("Mystery", ProductKind::PurchaseAndSale, GBP);
        let mut count = StockCount::new();

        count.push("sack", Decimal::ONE);

        assert_eq!(count.value(&product, &measures)?, Money::from_minor(0, GBP));

        Ok(())
    }
}
