//! Measure Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::measures::{Measure, MeasureError};

/// Wrapper for measures in YAML
#[derive(Debug, Deserialize)]
pub struct MeasuresFixture {
    /// Map of measure id -> measure fixture
    pub measures: FxHashMap<String, MeasureFixture>,
}

/// Measure Fixture
#[derive(Debug, Deserialize)]
pub struct MeasureFixture {
    /// Display name (e.g., "1 kg bag")
    pub name: String,

    /// Unit symbol (e.g., "kg", "ml", "each")
    pub unit: String,

    /// Amount of `unit` in one measure
    pub quantity: Decimal,
}

impl MeasureFixture {
    /// Build the measure registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`MeasureError`] if the quantity is not positive or the unit is blank.
    pub fn into_measure(self, id: String) -> Result<Measure, MeasureError> {
        Measure::new(id, self.name, self.unit, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_measures_yaml() -> TestResult {
        let fixture: MeasuresFixture = serde_norway::from_str(
            "measures:\n  bag:\n    name: 1 kg bag\n    unit: kg\n    quantity: 1\n  can:\n    name: 330 ml can\n    unit: ml\n    quantity: 330\n",
        )?;

        let bag = fixture
            .measures
            .into_iter()
            .find(|(id, _)| id == "bag")
            .ok_or("bag missing")?;

        let measure = bag.1.into_measure(bag.0)?;

        assert_eq!(measure.id(), "bag");
        assert_eq!(measure.unit(), "kg");
        assert_eq!(measure.quantity(), Decimal::ONE);

        Ok(())
    }

    #[test]
    fn into_measure_validates_quantity() -> TestResult {
        let fixture: MeasureFixture =
            serde_norway::from_str("name: Empty\nunit: kg\nquantity: 0\n")?;

        assert!(matches!(
            fixture.into_measure("empty".to_string()),
            Err(MeasureError::NonPositiveQuantity(..))
        ));

        Ok(())
    }
}
