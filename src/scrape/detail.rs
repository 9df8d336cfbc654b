//! Detail page extraction
//!
//! Reads the nutrition facts panel of a single food page. Each label element
//! is immediately followed by its value element; main rows and indented sub
//! rows (`.sub`) are matched with separate rules.

use serde::Serialize;

use super::dom::{Node, Page};
use super::number::parse_decimal;
use crate::models::{NutrientVector, NutritionFacts};

const FACTS_SELECTOR: &str = ".nutrition_facts";
const LABEL_SELECTOR: &str = ".nutrient.left";
const VALUE_SELECTOR: &str = ".nutrient.right";
const BASE_SERVING_SELECTOR: &str = ".serving_size_value";
const SERVING_ROW_SELECTOR: &str = "table.common tr";
const SUMMARY_SELECTOR: &str = r#"meta[name="description"]"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Carbohydrates,
    Sugar,
    Protein,
    FatTotal,
    FatSaturated,
    FatTrans,
    FatMonounsaturated,
    FatPolyunsaturated,
    Cholesterol,
    Fiber,
    Sodium,
    Potassium,
}

impl Field {
    fn set(self, v: &mut NutrientVector, amount: f64) {
        match self {
            Field::Carbohydrates => v.carbohydrates = amount,
            Field::Sugar => v.sugar = amount,
            Field::Protein => v.protein = amount,
            Field::FatTotal => v.fat.total = amount,
            Field::FatSaturated => v.fat.saturated = amount,
            Field::FatTrans => v.fat.trans = amount,
            Field::FatMonounsaturated => v.fat.monounsaturated = amount,
            Field::FatPolyunsaturated => v.fat.polyunsaturated = amount,
            Field::Cholesterol => v.cholesterol = amount,
            Field::Fiber => v.fiber = amount,
            Field::Sodium => v.sodium = amount,
            Field::Potassium => v.potassium = amount,
        }
    }
}

/// Lowercase, strip accents and hyphens, collapse whitespace
fn normalize_label(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .filter(|c| *c != '-')
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Energy is read by unit scans instead, so it has no main field
fn main_field(label: &str) -> Option<Field> {
    match label {
        "carboidratos" | "carboidrato" | "carboidratos totais" => Some(Field::Carbohydrates),
        "proteinas" | "proteina" => Some(Field::Protein),
        "gorduras" | "gordura" | "gordura total" | "gorduras totais" => Some(Field::FatTotal),
        "colesterol" => Some(Field::Cholesterol),
        "fibras" | "fibra" | "fibra alimentar" => Some(Field::Fiber),
        "sodio" => Some(Field::Sodium),
        "potassio" => Some(Field::Potassium),
        _ => None,
    }
}

/// Sub rows compare whole labels. "monoinsaturada" and "poliinsaturada" both
/// contain "saturada", so a substring test would cross-match.
fn sub_field(label: &str) -> Option<Field> {
    let label = label
        .strip_prefix("gorduras ")
        .or_else(|| label.strip_prefix("gordura "))
        .unwrap_or(label);

    match label {
        "acucar" | "acucares" => Some(Field::Sugar),
        "saturada" | "saturadas" => Some(Field::FatSaturated),
        "trans" => Some(Field::FatTrans),
        "monoinsaturada" | "monoinsaturadas" => Some(Field::FatMonounsaturated),
        "poliinsaturada" | "poliinsaturadas" => Some(Field::FatPolyunsaturated),
        _ => None,
    }
}

/// First value in the panel whose text carries `unit`
fn energy_scan(facts: &Node<'_>, unit: &str) -> f64 {
    facts
        .select(VALUE_SELECTOR)
        .iter()
        .map(|n| n.text().to_lowercase())
        .find(|t| t.contains(unit))
        .map(|t| parse_decimal(&t))
        .unwrap_or(0.0)
}

fn non_empty(text: String) -> Option<String> {
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Parse a food detail page. Never fails: anything that can't be read is 0.
pub fn extract_nutrients(html: &str, fallback_name: &str) -> NutritionFacts {
    let page = Page::parse(html);

    let name = page
        .first("h1")
        .and_then(|h| non_empty(h.text()))
        .unwrap_or_else(|| fallback_name.to_string());

    let mut nutrients = NutrientVector::zero();

    let Some(facts) = page.first(FACTS_SELECTOR) else {
        tracing::debug!("No nutrition facts panel for '{}'", name);
        return NutritionFacts {
            name,
            serving: None,
            nutrients,
        };
    };

    for label in facts.select(LABEL_SELECTOR) {
        let Some(value) = label.next_element() else {
            continue;
        };
        let text = normalize_label(&label.text());
        let field = if label.has_class("sub") {
            sub_field(&text)
        } else {
            main_field(&text)
        };
        if let Some(field) = field {
            field.set(&mut nutrients, parse_decimal(&value.text()));
        }
    }

    // kJ and kcal share the value column; only the unit tells them apart
    nutrients.energy_kj = energy_scan(&facts, "kj");
    nutrients.energy_kcal = energy_scan(&facts, "kcal");

    NutritionFacts {
        name,
        serving: facts.first(BASE_SERVING_SELECTOR).and_then(|s| non_empty(s.text())),
        nutrients,
    }
}

/// What a detail page declares about its servings, for gram estimation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServingContext {
    /// Serving the facts panel is expressed in, e.g. "100 g"
    pub base_serving: Option<String>,
    /// Common serving sizes, e.g. "1 porção (120g)"
    pub options: Vec<String>,
    /// Page summary, e.g. "Existem 156 calorias em 100 gramas de ..."
    pub summary: Option<String>,
}

/// Serving hints from a detail page: the base serving, the listed
/// alternatives and the description meta. Missing parts are empty.
pub fn extract_serving_context(html: &str) -> ServingContext {
    let page = Page::parse(html);

    let options = page
        .select(SERVING_ROW_SELECTOR)
        .iter()
        .filter_map(|row| row.first("td"))
        .filter_map(|cell| non_empty(cell.text()))
        .collect();

    ServingContext {
        base_serving: page
            .first(BASE_SERVING_SELECTOR)
            .and_then(|s| non_empty(s.text())),
        options,
        summary: page
            .first(SUMMARY_SELECTOR)
            .and_then(|m| m.attr("content"))
            .and_then(|c| non_empty(c.to_string())),
    }
}
