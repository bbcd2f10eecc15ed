//! Conversion
//!
//! Converts quantities of a measure into its base unit (grams, millilitres or
//! a raw count) and filters measures down to the ones that can be converted
//! between each other.
//!
//! Lookups are fail-soft: an unknown measure id leaves the quantity as-is
//! rather than raising an error, so partially configured stock still displays.

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    measures::{Measure, MeasureRegistry},
    units::{ConversionGroup, base_factor},
};

/// A quantity expressed in base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseQuantity {
    /// Total amount of the base unit
    pub total_quantity: Decimal,

    /// Group the quantity is expressed in, `None` if the measure was unknown
    pub unit: Option<ConversionGroup>,
}

/// Converts `quantity` of the measure `measure_id` into base units.
///
/// A negative or missing quantity converts to zero. An unknown measure id
/// returns the quantity unchanged.
pub fn convert_to_base(
    measures: &MeasureRegistry,
    measure_id: &str,
    quantity: impl Into<Option<Decimal>>,
) -> Decimal {
    to_base(measures, measure_id, quantity).total_quantity
}

/// Converts `quantity` of the measure `measure_id` into base units, keeping
/// track of which base unit it ended up in.
pub fn to_base(
    measures: &MeasureRegistry,
    measure_id: &str,
    quantity: impl Into<Option<Decimal>>,
) -> BaseQuantity {
    let Some(quantity) = quantity.into().filter(|q| *q >= Decimal::ZERO) else {
        return BaseQuantity {
            total_quantity: Decimal::ZERO,
            unit: measures.get(measure_id).map(Measure::group),
        };
    };

    let Some(measure) = measures.get(measure_id) else {
        debug!(measure_id, %quantity, "unknown measure; quantity left unconverted");

        return BaseQuantity {
            total_quantity: quantity,
            unit: None,
        };
    };

    BaseQuantity {
        total_quantity: quantity
            .saturating_mul(measure.quantity())
            .saturating_mul(base_factor(measure.unit())),
        unit: Some(measure.group()),
    }
}

/// Returns the measures that share a conversion group with `reference_id`.
///
/// When the reference measure is unknown every measure is returned.
pub fn compatible_measures<'a>(
    measures: &'a MeasureRegistry,
    reference_id: &str,
) -> Vec<&'a Measure> {
    let Some(reference) = measures.get(reference_id) else {
        return measures.iter().collect();
    };

    let group = reference.group();

    measures
        .iter()
        .filter(|measure| measure.group() == group)
        .collect()
}
