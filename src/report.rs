//! Costing report

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    costing::{CostBreakdown, try_calculate_costing},
    measures::{Measure, MeasureRegistry},
    products::Product,
    units::ConversionGroup,
};

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// One product's line in a costing report.
#[derive(Debug, Clone)]
pub struct CostingRow {
    /// Product name
    pub product: String,

    /// Default purchase unit, e.g. "keg @ £180.00"
    pub purchase: String,

    /// Default sale unit, e.g. "pint @ £5.50"
    pub sale: String,

    /// Base unit the figures are expressed per
    pub base_unit: Option<ConversionGroup>,

    /// Currency the figures are expressed in
    pub currency: &'static Currency,

    /// Costing figures, zero when the product could not be costed
    pub breakdown: CostBreakdown,

    /// Whether the product could be costed
    pub costed: bool,
}

/// Costing of a set of products.
#[derive(Debug, Clone, Default)]
pub struct CostingReport {
    rows: Vec<CostingRow>,
}

impl CostingReport {
    /// Cost every product against `measures`.
    pub fn from_products<'p, 'a: 'p>(
        products: impl IntoIterator<Item = &'p Product<'a>>,
        measures: &MeasureRegistry,
    ) -> Self {
        let rows = products
            .into_iter()
            .map(|product| {
                let purchase = product.default_purchase_unit().map_or_else(String::new, |unit| {
                    priced_label(measures, &unit.measure, unit.quantity, &unit.price)
                });
                let sale = product.default_sale_unit().map_or_else(String::new, |unit| {
                    priced_label(measures, &unit.measure, unit.quantity, &unit.price)
                });
                let base_unit = product
                    .default_purchase_measure()
                    .or(product.default_sale_measure())
                    .and_then(|id| measures.get(id))
                    .map(Measure::group);

                let breakdown = try_calculate_costing(product, measures);

                CostingRow {
                    product: product.name().to_string(),
                    purchase,
                    sale,
                    base_unit,
                    currency: product.currency(),
                    breakdown: breakdown.unwrap_or(CostBreakdown::ZERO),
                    costed: breakdown.is_some(),
                }
            })
            .collect();

        CostingReport { rows }
    }

    /// Report rows, one per product
    pub fn rows(&self) -> &[CostingRow] {
        &self.rows
    }

    /// Rows for products that could be costed.
    pub fn costed(&self) -> impl Iterator<Item = &CostingRow> {
        self.rows.iter().filter(|row| row.costed)
    }

    /// Writes the report as a table.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let mut builder = Builder::default();

        builder.push_record([
            "Product",
            "Purchase",
            "Sale",
            "Cost / base",
            "Sale / base",
            "Gross profit",
            "Margin",
        ]);

        for row in &self.rows {
            let per_base = |value: Decimal| per_base_unit(value, row);

            builder.push_record([
                row.product.clone(),
                row.purchase.clone(),
                row.sale.clone(),
                per_base(row.breakdown.cost_per_base_unit),
                per_base(row.breakdown.sale_price_per_base_unit),
                per_base(row.breakdown.gross_profit),
                format!("{:.2}%", row.breakdown.profit_margin),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..7), Alignment::right());

        writeln!(out, "\n{table}")?;
        writeln!(
            out,
            " {} products, {} costed",
            self.rows.len(),
            self.costed().count()
        )?;

        Ok(())
    }
}

fn priced_label(
    measures: &MeasureRegistry,
    measure_id: &str,
    quantity: Decimal,
    price: &Money<'_, Currency>,
) -> String {
    let name = measures.get(measure_id).map_or(measure_id, Measure::name);

    if quantity == Decimal::ONE {
        format!("{name} @ {price}")
    } else {
        format!("{} x {name} @ {price}", quantity.normalize())
    }
}

fn per_base_unit(value: Decimal, row: &CostingRow) -> String {
    let amount = format!("{}{:.4}", row.currency.symbol, value);

    match &row.base_unit {
        Some(unit) => format!("{amount} / {unit}"),
        None => amount,
    }
}
