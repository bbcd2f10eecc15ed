//! Measures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::units::{ConversionGroup, conversion_group};

new_key_type! {
    /// Measure Key
    pub struct MeasureKey;
}

/// Errors raised while defining or registering measures.
#[derive(Debug, Error, PartialEq)]
pub enum MeasureError {
    /// A measure must represent a positive amount of its unit (measure id, quantity).
    #[error("measure {0} must have a positive quantity, got {1}")]
    NonPositiveQuantity(String, Decimal),

    /// A measure has no unit symbol.
    #[error("measure {0} has no unit")]
    EmptyUnit(String),

    /// Another measure with the same id is already registered.
    #[error("measure {0} is already registered")]
    DuplicateId(String),
}

/// A packaging or portion size, e.g. "1 kg bag" or "330 ml can".
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    id: String,
    name: String,
    unit: String,
    quantity: Decimal,
}

impl Measure {
    /// Creates a new measure representing `quantity` of `unit`.
    ///
    /// # Errors
    ///
    /// - [`MeasureError::NonPositiveQuantity`]: `quantity` is zero or negative.
    /// - [`MeasureError::EmptyUnit`]: `unit` is blank.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        quantity: Decimal,
    ) -> Result<Self, MeasureError> {
        let id = id.into();
        let unit = unit.into();

        if quantity <= Decimal::ZERO {
            return Err(MeasureError::NonPositiveQuantity(id, quantity));
        }

        if unit.trim().is_empty() {
            return Err(MeasureError::EmptyUnit(id));
        }

        Ok(Measure {
            id,
            name: name.into(),
            unit,
            quantity,
        })
    }

    /// Measure id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit symbol as entered
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Amount of `unit` represented by one of this measure
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Conversion group of this measure's unit
    pub fn group(&self) -> ConversionGroup {
        conversion_group(&self.unit)
    }
}

/// Lookup table of measures by id.
///
/// Iteration yields measures in registration order.
#[derive(Debug, Default)]
pub struct MeasureRegistry {
    measures: SlotMap<MeasureKey, Measure>,
    ids: FxHashMap<String, MeasureKey>,
}

impl MeasureRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from a list of measures.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::DuplicateId`] if two measures share an id.
    pub fn with_measures(
        measures: impl IntoIterator<Item = Measure>,
    ) -> Result<Self, MeasureError> {
        let mut registry = Self::new();

        for measure in measures {
            registry.insert(measure)?;
        }

        Ok(registry)
    }

    /// Register a measure.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::DuplicateId`] if the id is already registered.
    pub fn insert(&mut self, measure: Measure) -> Result<MeasureKey, MeasureError> {
        if self.ids.contains_key(measure.id()) {
            return Err(MeasureError::DuplicateId(measure.id));
        }

        let id = measure.id.clone();
        let key = self.measures.insert(measure);

        self.ids.insert(id, key);

        Ok(key)
    }

    /// Look up a measure by id.
    pub fn get(&self, id: &str) -> Option<&Measure> {
        self.ids.get(id).and_then(|key| self.measures.get(*key))
    }

    /// Look up a measure by key.
    pub fn get_by_key(&self, key: MeasureKey) -> Option<&Measure> {
        self.measures.get(key)
    }

    /// Key for a measure id.
    pub fn key(&self, id: &str) -> Option<MeasureKey> {
        self.ids.get(id).copied()
    }

    /// Check whether a measure id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Iterate over the registered measures.
    pub fn iter(&self) -> impl Iterator<Item = &Measure> {
        self.measures.values()
    }

    /// Number of registered measures.
    pub fn len(&self) -> usize {
        self.measures.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_rejects_non_positive_quantity() {
        let zero = Measure::new("m1", "Nothing", "kg", Decimal::ZERO);
        let negative = Measure::new("m2", "Less than nothing", "kg", Decimal::NEGATIVE_ONE);

        assert_eq!(
            zero,
            Err(MeasureError::NonPositiveQuantity("m1".to_string(), Decimal::ZERO))
        );
        assert!(matches!(
            negative,
            Err(MeasureError::NonPositiveQuantity(id, _)) if id == "m2"
        ));
    }

    #[test]
    fn new_rejects_blank_unit() {
        let result = Measure::new("m1", "Mystery", "  ", Decimal::ONE);

        assert_eq!(result, Err(MeasureError::EmptyUnit("m1".to_string())));
    }

    #[test]
    fn group_follows_unit() -> TestResult {
        let bag = Measure::new("bag", "1 kg bag", "kg", Decimal::ONE)?;

        assert_eq!(bag.group(), ConversionGroup::Grams);

        Ok(())
    }

    #[test]
    fn insert_rejects_duplicate_ids() -> TestResult {
        let mut registry = MeasureRegistry::new();

        registry.insert(Measure::new("bag", "1 kg bag", "kg", Decimal::ONE)?)?;
        let result = registry.insert(Measure::new("bag", "Another bag", "kg", Decimal::TWO)?);

        assert_eq!(result, Err(MeasureError::DuplicateId("bag".to_string())));
        assert_eq!(registry.len(), 1);

        Ok(())
    }

    #[test]
    fn lookups_by_id_and_key_agree() -> TestResult {
        let registry = MeasureRegistry::with_measures([
            Measure::new("bag", "1 kg bag", "kg", Decimal::ONE)?,
            Measure::new("can", "330 ml can", "ml", Decimal::from(330))?,
        ])?;

        let key = registry.key("can").ok_or("missing key")?;

        assert_eq!(registry.get("can"), registry.get_by_key(key));
        assert!(registry.contains("bag"));
        assert!(!registry.contains("crate"));
        assert!(registry.get("crate").is_none());

        Ok(())
    }

    #[test]
    fn iter_preserves_registration_order() -> TestResult {
        let registry = MeasureRegistry::with_measures([
            Measure::new("bag", "1 kg bag", "kg", Decimal::ONE)?,
            Measure::new("can", "330 ml can", "ml", Decimal::from(330))?,
            Measure::new("each", "Each", "each", Decimal::ONE)?,
        ])?;

        let ids: Vec<&str> = registry.iter().map(Measure::id).collect();

        assert_eq!(ids, vec!["bag", "can", "each"]);
        assert!(!registry.is_empty());

        Ok(())
    }
}
