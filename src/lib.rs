//! Larder
//!
//! Larder converts stock measures to base units (grams, millilitres or discrete units),
//! counts stock across measures and costs products against their purchase and sale prices.

pub mod conversion;
pub mod costing;
pub mod fixtures;
pub mod measures;
pub mod observability;
pub mod prelude;
pub mod products;
pub mod report;
pub mod stock;
pub mod units;
pub mod utils;
