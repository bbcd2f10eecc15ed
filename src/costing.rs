//! Costing
//!
//! Cost, gross profit and margin per base unit, derived from a product's
//! default purchase and sale units. All figures are in major currency units
//! (e.g. pounds per gram) and every calculation falls back to zero instead of
//! failing.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{conversion::convert_to_base, measures::MeasureRegistry, products::Product};

/// Per-base-unit costing of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CostBreakdown {
    /// Purchase cost of one base unit
    pub cost_per_base_unit: Decimal,

    /// Sale price of one base unit
    pub sale_price_per_base_unit: Decimal,

    /// Sale price less cost, per base unit
    pub gross_profit: Decimal,

    /// Gross profit as a percentage of the sale price (50 means 50%)
    pub profit_margin: Decimal,
}

impl CostBreakdown {
    /// A breakdown with every figure at zero.
    pub const ZERO: CostBreakdown = CostBreakdown {
        cost_per_base_unit: Decimal::ZERO,
        sale_price_per_base_unit: Decimal::ZERO,
        gross_profit: Decimal::ZERO,
        profit_margin: Decimal::ZERO,
    };

    /// Profit margin as a fractional percentage.
    pub fn margin_percentage(&self) -> Percentage {
        Percentage::from(
            self.profit_margin
                .checked_div(Decimal::ONE_HUNDRED)
                .unwrap_or(Decimal::ZERO),
        )
    }
}

/// Price of one base unit when `quantity` of `measure_id` costs `price`.
///
/// Returns zero when the converted quantity is zero.
pub fn price_per_base_unit(
    measures: &MeasureRegistry,
    measure_id: &str,
    quantity: Decimal,
    price: &Money<'_, Currency>,
) -> Decimal {
    let base_quantity = convert_to_base(measures, measure_id, quantity);

    major_units(price)
        .checked_div(base_quantity)
        .unwrap_or(Decimal::ZERO)
}

/// Calculates the per-base-unit costing of a product.
///
/// Returns [`CostBreakdown::ZERO`] when the product cannot be sold, or when
/// either default unit cannot be resolved.
pub fn calculate_costing(product: &Product<'_>, measures: &MeasureRegistry) -> CostBreakdown {
    try_calculate_costing(product, measures).unwrap_or(CostBreakdown::ZERO)
}

/// Like [`calculate_costing`], but `None` when the product cannot be costed at all.
///
/// A product whose prices are all zero is still costed and yields `Some`.
pub fn try_calculate_costing(
    product: &Product<'_>,
    measures: &MeasureRegistry,
) -> Option<CostBreakdown> {
    if !product.kind().supports_sale() {
        return None;
    }

    let purchase = product.default_purchase_unit()?;
    let sale = product.default_sale_unit()?;

    let cost_per_base_unit =
        price_per_base_unit(measures, &purchase.measure, purchase.quantity, &purchase.price);
    let sale_price_per_base_unit =
        price_per_base_unit(measures, &sale.measure, sale.quantity, &sale.price);

    let gross_profit = sale_price_per_base_unit
        .checked_sub(cost_per_base_unit)
        .unwrap_or(Decimal::ZERO);

    let profit_margin = gross_profit
        .checked_div(sale_price_per_base_unit)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO);

    Some(CostBreakdown {
        cost_per_base_unit,
        sale_price_per_base_unit,
        gross_profit,
        profit_margin,
    })
}

/// Purchase cost of one base unit of the product.
pub fn cost_per_base_unit(product: &Product<'_>, measures: &MeasureRegistry) -> Decimal {
    calculate_costing(product, measures).cost_per_base_unit
}

/// Gross profit on one base unit of the product.
pub fn gross_profit(product: &Product<'_>, measures: &MeasureRegistry) -> Decimal {
    calculate_costing(product, measures).gross_profit
}

/// Gross profit as a percentage of the sale price per base unit.
pub fn profit_margin(product: &Product<'_>, measures: &MeasureRegistry) -> Decimal {
    calculate_costing(product, measures).profit_margin
}

/// Amount of `price` in major units.
pub(crate) fn major_units(price: &Money<'_, Currency>) -> Decimal {
    Decimal::new(price.to_minor_units(), price.currency().exponent)
}
