//! Food resolution value objects
//!
//! Everything produced by a single analysis call. Nothing here is shared or
//! mutated once built.

use serde::{Deserialize, Serialize};

use super::nutrition::{round2, NutrientVector};

/// Grams assumed when no serving is given or the serving can't be resolved
pub const DEFAULT_SERVING_GRAMS: f64 = 100.0;

/// One row of a food search results page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub name: String,
    pub brand: Option<String>,
    pub url: String,
    /// Coarse per-100g preview values from the results page
    pub calories: f64,
    pub fat: f64,
    pub carbs: f64,
    pub protein: f64,
}

/// Parsed detail page: per-100g nutrients plus what the page says about itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionFacts {
    pub name: String,
    /// Base serving declared by the facts panel, e.g. "100 g"
    pub serving: Option<String>,
    pub nutrients: NutrientVector,
}

/// A serving description turned into grams
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServingResolution {
    pub serving_text: Option<String>,
    pub grams: f64,
    pub multiplier: f64,
}

impl ServingResolution {
    /// Build from resolved grams. Non-positive or non-finite grams fall back to 100.
    pub fn new(serving_text: Option<String>, grams: f64) -> Self {
        let grams = if grams.is_finite() && grams > 0.0 {
            grams
        } else {
            DEFAULT_SERVING_GRAMS
        };
        Self {
            serving_text,
            grams,
            multiplier: grams / 100.0,
        }
    }

    /// No serving given: plain 100g
    pub fn default_serving() -> Self {
        Self::new(None, DEFAULT_SERVING_GRAMS)
    }
}

/// One food of a meal request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItemRequest {
    pub food_name: String,
    #[serde(default)]
    pub serving: Option<String>,
}

impl MealItemRequest {
    /// Item with an optional free-text serving
    pub fn new(food_name: impl Into<String>, serving: Option<&str>) -> Self {
        Self {
            food_name: food_name.into(),
            serving: serving.map(str::to_string),
        }
    }
}

/// A food fully resolved to a source entry and scaled to its serving
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFoodItem {
    pub food_name: String,
    pub serving: Option<String>,
    pub matched_name: String,
    pub source_url: String,
    pub grams: f64,
    pub nutrients: NutrientVector,
}

/// Totals for a whole meal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub item_count: usize,
    pub total_grams: f64,
    pub totals: NutrientVector,
    pub items: Vec<ResolvedFoodItem>,
}

impl AggregateResult {
    /// Totals of a meal with no items
    pub fn empty() -> Self {
        Self {
            item_count: 0,
            total_grams: 0.0,
            totals: NutrientVector::zero(),
            items: Vec::new(),
        }
    }

    /// Sum items in order, rounding grams and every nutrient once at the end
    pub fn from_items(items: Vec<ResolvedFoodItem>) -> Self {
        let mut totals = NutrientVector::zero();
        let mut total_grams = 0.0;
        for item in &items {
            totals = totals.add(&item.nutrients);
            total_grams += item.grams;
        }

        Self {
            item_count: items.len(),
            total_grams: round2(total_grams),
            totals: totals.rounded(),
            items,
        }
    }
}
