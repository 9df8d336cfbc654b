//! Nutrition calculation module
//!
//! Serving scaling and weight unit conversions.

pub mod scaler;
pub mod units;

pub use scaler::scale;
pub use units::{grams_per_unit, parse_weight};
