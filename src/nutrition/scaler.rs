//! Nutrient scaling
//!
//! Per-100g facts to a resolved serving.

use crate::models::NutrientVector;

/// Multiply every field by `multiplier`, then round each to 2 decimals
/// (half away from zero). No clamping; callers guarantee `multiplier > 0`.
pub fn scale(vector: &NutrientVector, multiplier: f64) -> NutrientVector {
    vector.scale(multiplier).rounded()
}
