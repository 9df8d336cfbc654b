//! Weight units
//!
//! Recognizes servings that already state a weight ("150g", "0,5 kg", "8 oz")
//! so they can be converted without asking the oracle.

use crate::scrape::parse_decimal;

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;

/// Get the conversion factor to grams for a weight unit
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    let lower = unit.to_lowercase();

    match lower.trim() {
        "g" | "gr" | "grama" | "gramas" | "gram" | "grams" => Some(1.0),
        "mg" | "miligrama" | "miligramas" => Some(G_PER_MG),
        "kg" | "quilo" | "quilos" | "kilo" | "kilos" | "quilograma" | "quilogramas" => {
            Some(G_PER_KG)
        }
        "oz" | "ounce" | "ounces" => Some(G_PER_OZ),
        "lb" | "lbs" | "pound" | "pounds" => Some(G_PER_LB),
        _ => None,
    }
}

/// Parse a serving that is nothing but a weight, e.g. "150g" or "1,5 kg".
///
/// Returns None for anything else ("1 prato cheio", "2 colheres de sopa"),
/// including weights embedded in a longer description.
pub fn parse_weight(serving: &str) -> Option<f64> {
    let trimmed = serving.trim();
    let split = trimmed.find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))?;
    let (number, unit) = trimmed.split_at(split);
    if number.is_empty() {
        return None;
    }

    let factor = grams_per_unit(unit)?;
    let grams = parse_decimal(number) * factor;
    (grams > 0.0).then_some(grams)
}
