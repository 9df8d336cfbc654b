//! Data models
//!
//! Value objects of the analysis pipeline and the stored meal log.

mod food;
mod meal_log;
mod nutrition;

pub use food::{
    AggregateResult, MealItemRequest, NutritionFacts, ResolvedFoodItem, SearchCandidate,
    ServingResolution, DEFAULT_SERVING_GRAMS,
};
pub use meal_log::{MealLog, MealLogItem};
pub use nutrition::{round2, Fat, NutrientVector};
