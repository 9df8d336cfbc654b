//! Serving size estimation
//!
//! Turns "1 prato cheio" or "2 colheres de sopa" into grams, using the serving
//! options the detail page declares as reference.

use serde::Deserialize;

use super::{Oracle, OracleRequest};
use crate::models::DEFAULT_SERVING_GRAMS;
use crate::nutrition::parse_weight;
use crate::scrape::{extract_serving_context, ServingContext};

const SYSTEM_PROMPT: &str = "You estimate how many grams a household serving description \
of a food weighs. Use the reference servings from the nutrition database when they \
apply. Answer only with the tool.";

#[derive(Debug, Deserialize)]
struct GramsEstimate {
    #[serde(rename = "gramsAmount")]
    grams_amount: f64,
}

fn build_request(food_name: &str, user_serving: &str, ctx: &ServingContext) -> OracleRequest {
    let mut prompt = format!("Food: {}\nServing eaten: {}\n", food_name, user_serving);

    if let Some(base) = &ctx.base_serving {
        prompt.push_str(&format!("Nutrition facts are given per: {}\n", base));
    }
    if let Some(summary) = &ctx.summary {
        prompt.push_str(&format!("Summary: {}\n", summary));
    }
    if !ctx.options.is_empty() {
        prompt.push_str("Reference servings:\n");
        for option in &ctx.options {
            prompt.push_str(&format!("- {}\n", option));
        }
    }
    prompt.push_str("\nHow many grams is the serving eaten?");

    OracleRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt,
        tool_name: "estimate_serving_grams",
        schema: serde_json::json!({
            "type": "object",
            "properties": {
                "gramsAmount": {
                    "type": "number",
                    "exclusiveMinimum": 0,
                    "description": "Weight of the serving in grams"
                }
            },
            "required": ["gramsAmount"]
        }),
    }
}

/// Resolve a serving description to grams. Never fails: any oracle problem
/// (error, non-numeric or non-positive answer) gives exactly 100.
///
/// Servings that are already a plain weight ("150g", "0,5 kg") are converted
/// directly.
pub async fn resolve_serving_grams(
    oracle: &dyn Oracle,
    food_name: &str,
    user_serving: &str,
    detail_html: &str,
) -> f64 {
    if user_serving.trim().is_empty() {
        return DEFAULT_SERVING_GRAMS;
    }
    if let Some(grams) = parse_weight(user_serving) {
        return grams;
    }

    let ctx = extract_serving_context(detail_html);
    let raw = match oracle.complete(&build_request(food_name, user_serving, &ctx)).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Serving '{}' for '{}' defaulted to 100g: {}", user_serving, food_name, e);
            return DEFAULT_SERVING_GRAMS;
        }
    };

    match serde_json::from_str::<GramsEstimate>(&raw) {
        Ok(estimate) if estimate.grams_amount.is_finite() && estimate.grams_amount > 0.0 => {
            estimate.grams_amount
        }
        Ok(estimate) => {
            tracing::warn!(
                "Non-positive estimate {} for '{}', using 100g",
                estimate.grams_amount,
                user_serving
            );
            DEFAULT_SERVING_GRAMS
        }
        Err(e) => {
            tracing::warn!("Unparseable estimate '{}' for '{}': {}", raw, user_serving, e);
            DEFAULT_SERVING_GRAMS
        }
    }
}
