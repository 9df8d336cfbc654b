//! Candidate disambiguation
//!
//! Picks the search result that best matches what the user ate.

use serde::Deserialize;

use super::{Oracle, OracleRequest};
use crate::analysis::{AnalysisError, AnalysisResult};
use crate::models::SearchCandidate;

const SYSTEM_PROMPT: &str = "You match a food someone ate to the best entry of a Brazilian \
nutrition database. Prefer the entry that matches the food as it is usually eaten \
(cooked, prepared) unless the description says otherwise. Prefer generic entries over \
branded ones unless a brand is mentioned. Answer only with the tool.";

#[derive(Debug, Deserialize)]
struct Selection {
    #[serde(rename = "foodItem")]
    food_item: i64,
}

fn describe(index: usize, c: &SearchCandidate) -> String {
    let brand = c
        .brand
        .as_deref()
        .map(|b| format!(" ({})", b))
        .unwrap_or_default();
    format!(
        "{}. {}{} - {} kcal, {}g fat, {}g carbs, {}g protein per 100g",
        index + 1,
        c.name,
        brand,
        c.calories,
        c.fat,
        c.carbs,
        c.protein
    )
}

fn build_request(query: &str, candidates: &[SearchCandidate]) -> OracleRequest {
    let options = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| describe(i, c))
        .collect::<Vec<_>>()
        .join("\n");

    OracleRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt: format!(
            "Food: {}\n\nOptions:\n{}\n\nReturn the number of the best option.",
            query, options
        ),
        tool_name: "select_food_item",
        schema: serde_json::json!({
            "type": "object",
            "properties": {
                "foodItem": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": candidates.len(),
                    "description": "1-based number of the chosen option"
                }
            },
            "required": ["foodItem"]
        }),
    }
}

/// Choose one candidate for `query`.
///
/// A single candidate is returned without consulting the oracle. Any oracle
/// failure or out-of-range answer falls back to the first candidate.
pub async fn select_best_match(
    oracle: &dyn Oracle,
    query: &str,
    candidates: &[SearchCandidate],
) -> AnalysisResult<SearchCandidate> {
    let first = candidates.first().ok_or_else(|| AnalysisError::NotFound {
        query: query.to_string(),
    })?;
    if candidates.len() == 1 {
        return Ok(first.clone());
    }

    let raw = match oracle.complete(&build_request(query, candidates)).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Candidate selection for '{}' fell back to first: {}", query, e);
            return Ok(first.clone());
        }
    };

    let index = match serde_json::from_str::<Selection>(&raw) {
        Ok(selection) => selection.food_item,
        Err(e) => {
            tracing::warn!("Unparseable selection '{}' for '{}': {}", raw, query, e);
            return Ok(first.clone());
        }
    };

    match usize::try_from(index).ok().and_then(|i| i.checked_sub(1)).and_then(|i| candidates.get(i)) {
        Some(chosen) => Ok(chosen.clone()),
        None => {
            tracing::warn!(
                "Selection {} out of range 1..={} for '{}'",
                index,
                candidates.len(),
                query
            );
            Ok(first.clone())
        }
    }
}
