//! Larder prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    conversion::{BaseQuantity, compatible_measures, convert_to_base, to_base},
    costing::{
        CostBreakdown, calculate_costing, cost_per_base_unit, gross_profit, price_per_base_unit,
        profit_margin, try_calculate_costing,
    },
    fixtures::{Fixture, FixtureError},
    measures::{Measure, MeasureError, MeasureKey, MeasureRegistry},
    observability::{LogFormat, LoggingConfig, ObservabilityError, init_subscriber},
    products::{Product, ProductError, ProductKey, ProductKind, PurchaseUnit, SaleUnit},
    report::{CostingReport, CostingRow, ReportError},
    stock::{StockCount, StockEntry, StockError},
    units::{ConversionGroup, base_factor, conversion_group},
};
