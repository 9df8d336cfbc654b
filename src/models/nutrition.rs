//! Shared nutrient vector
//!
//! Used for per-100g facts, scaled servings, and meal totals.

use serde::{Deserialize, Serialize};

/// Fat breakdown, all in grams
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fat {
    pub total: f64,
    pub saturated: f64,
    pub trans: f64,
    pub monounsaturated: f64,
    pub polyunsaturated: f64,
}

/// Complete nutrition record. Missing values are 0, never absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientVector {
    pub energy_kj: f64,
    pub energy_kcal: f64,
    pub carbohydrates: f64, // grams
    pub sugar: f64,         // grams
    pub protein: f64,       // grams
    pub fat: Fat,
    pub cholesterol: f64, // milligrams
    pub fiber: f64,       // grams
    pub sodium: f64,      // milligrams
    pub potassium: f64,   // milligrams
}

impl NutrientVector {
    /// Create a new NutrientVector with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Apply `f` to every field
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            energy_kj: f(self.energy_kj),
            energy_kcal: f(self.energy_kcal),
            carbohydrates: f(self.carbohydrates),
            sugar: f(self.sugar),
            protein: f(self.protein),
            fat: Fat {
                total: f(self.fat.total),
                saturated: f(self.fat.saturated),
                trans: f(self.fat.trans),
                monounsaturated: f(self.fat.monounsaturated),
                polyunsaturated: f(self.fat.polyunsaturated),
            },
            cholesterol: f(self.cholesterol),
            fiber: f(self.fiber),
            sodium: f(self.sodium),
            potassium: f(self.potassium),
        }
    }

    /// Scale every field by a multiplier, without rounding
    pub fn scale(&self, multiplier: f64) -> Self {
        self.map(|v| v * multiplier)
    }

    /// Round every field to 2 decimals
    pub fn rounded(&self) -> Self {
        self.map(round2)
    }

    /// Add another vector to this one, field by field
    pub fn add(&self, other: &NutrientVector) -> Self {
        Self {
            energy_kj: self.energy_kj + other.energy_kj,
            energy_kcal: self.energy_kcal + other.energy_kcal,
            carbohydrates: self.carbohydrates + other.carbohydrates,
            sugar: self.sugar + other.sugar,
            protein: self.protein + other.protein,
            fat: Fat {
                total: self.fat.total + other.fat.total,
                saturated: self.fat.saturated + other.fat.saturated,
                trans: self.fat.trans + other.fat.trans,
                monounsaturated: self.fat.monounsaturated + other.fat.monounsaturated,
                polyunsaturated: self.fat.polyunsaturated + other.fat.polyunsaturated,
            },
            cholesterol: self.cholesterol + other.cholesterol,
            fiber: self.fiber + other.fiber,
            sodium: self.sodium + other.sodium,
            potassium: self.potassium + other.potassium,
        }
    }
}

/// Round to 2 decimals, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
