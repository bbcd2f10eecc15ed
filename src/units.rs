//! Units
//!
//! Classification of the free-form unit symbols carried by measures. Weight
//! units collapse into grams, volume units into millilitres, and anything else
//! is treated as a discrete count unit that only converts to itself.

use std::fmt;

use rust_decimal::Decimal;

/// The family of interchangeable units a unit symbol belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConversionGroup {
    /// Weight, expressed in grams.
    Grams,

    /// Volume, expressed in millilitres.
    Millilitres,

    /// A counted unit (e.g. `each`, `case`), kept exactly as written.
    Discrete(String),
}

impl ConversionGroup {
    /// Base unit symbol of the group: `g`, `ml`, or the discrete unit itself.
    pub fn as_str(&self) -> &str {
        match self {
            ConversionGroup::Grams => "g",
            ConversionGroup::Millilitres => "ml",
            ConversionGroup::Discrete(unit) => unit,
        }
    }
}

impl fmt::Display for ConversionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognised unit symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitClass {
    Kilogram,
    Gram,
    Litre,
    Millilitre,
    Other,
}

impl UnitClass {
    fn classify(unit: &str) -> Self {
        let unit = unit.trim();

        if unit.eq_ignore_ascii_case("kg") {
            UnitClass::Kilogram
        } else if unit.eq_ignore_ascii_case("g") {
            UnitClass::Gram
        } else if ["l", "litre", "liter"]
            .iter()
            .any(|symbol| unit.eq_ignore_ascii_case(symbol))
        {
            UnitClass::Litre
        } else if unit.eq_ignore_ascii_case("ml") {
            UnitClass::Millilitre
        } else {
            UnitClass::Other
        }
    }
}

/// Returns the conversion group for a unit symbol.
///
/// Surrounding whitespace is ignored. Matching is case-insensitive for the
/// metric symbols; any other symbol keeps its case as its own discrete group.
pub fn conversion_group(unit: &str) -> ConversionGroup {
    match UnitClass::classify(unit) {
        UnitClass::Kilogram | UnitClass::Gram => ConversionGroup::Grams,
        UnitClass::Litre | UnitClass::Millilitre => ConversionGroup::Millilitres,
        UnitClass::Other => ConversionGroup::Discrete(unit.trim().to_string()),
    }
}

/// Factor that scales a quantity of `unit` into its group's base unit.
pub fn base_factor(unit: &str) -> Decimal {
    match UnitClass::classify(unit) {
        UnitClass::Kilogram | UnitClass::Litre => Decimal::ONE_THOUSAND,
        UnitClass::Gram | UnitClass::Millilitre | UnitClass::Other => Decimal::ONE,
    }
}
