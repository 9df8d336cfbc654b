//! Food resolution and meal aggregation
//!
//! search -> select -> detail -> serving -> scale, once per food. Meals resolve
//! their items one at a time: the data source and the oracle are both
//! rate-limited third parties.

use std::sync::Arc;

use super::error::{AnalysisError, AnalysisResult};
use super::source::FoodSource;
use crate::models::{AggregateResult, MealItemRequest, ResolvedFoodItem, ServingResolution};
use crate::nutrition::scale;
use crate::oracle::{resolve_serving_grams, select_best_match, Oracle};
use crate::scrape::{extract_candidates, extract_nutrients};

/// Runs the food pipeline against one data source and one oracle
#[derive(Clone)]
pub struct Analyzer {
    source: Arc<dyn FoodSource>,
    oracle: Arc<dyn Oracle>,
}

impl Analyzer {
    /// Pair a data source with the oracle that disambiguates its results
    pub fn new(source: Arc<dyn FoodSource>, oracle: Arc<dyn Oracle>) -> Self {
        Self { source, oracle }
    }

    /// Resolve one food and scale it to its serving (100g when none is given)
    pub async fn resolve_food(
        &self,
        food_name: &str,
        serving: Option<&str>,
    ) -> AnalysisResult<ResolvedFoodItem> {
        let search_html = self.source.search(food_name).await?;
        let candidates = extract_candidates(&search_html, self.source.base_url());
        if candidates.is_empty() {
            return Err(AnalysisError::NotFound {
                query: food_name.to_string(),
            });
        }

        let chosen = select_best_match(self.oracle.as_ref(), food_name, &candidates).await?;
        let detail_html = self.source.fetch_page(&chosen.url).await?;
        let facts = extract_nutrients(&detail_html, &chosen.name);

        let serving_text = serving.map(str::trim).filter(|s| !s.is_empty());
        let resolution = match serving_text {
            Some(text) => {
                let grams =
                    resolve_serving_grams(self.oracle.as_ref(), &chosen.name, text, &detail_html)
                        .await;
                ServingResolution::new(Some(text.to_string()), grams)
            }
            None => ServingResolution::default_serving(),
        };

        tracing::info!(
            food = food_name,
            matched = %chosen.name,
            grams = resolution.grams,
            "Resolved food item"
        );

        Ok(ResolvedFoodItem {
            food_name: food_name.to_string(),
            serving: resolution.serving_text,
            matched_name: chosen.name,
            source_url: chosen.url,
            grams: resolution.grams,
            nutrients: scale(&facts.nutrients, resolution.multiplier),
        })
    }

    /// Resolve every item in order and sum them. One failing item fails the
    /// whole meal.
    pub async fn aggregate(&self, items: &[MealItemRequest]) -> AnalysisResult<AggregateResult> {
        let mut resolved = Vec::with_capacity(items.len());
        for item in items {
            resolved.push(self.resolve_food(&item.food_name, item.serving.as_deref()).await?);
        }

        let result = AggregateResult::from_items(resolved);
        tracing::info!(
            items = result.item_count,
            total_grams = result.total_grams,
            kcal = result.totals.energy_kcal,
            "Aggregated meal"
        );
        Ok(result)
    }
}
