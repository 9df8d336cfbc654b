//! Search results extraction
//!
//! Turns a food search results page into ranked candidates with coarse
//! per-100g macros.

use std::sync::LazyLock;

use regex::Regex;

use super::dom::{Node, Page};
use super::number::parse_decimal;
use crate::models::SearchCandidate;

/// At most this many candidates are offered for disambiguation
pub const MAX_CANDIDATES: usize = 10;

const ROW_SELECTOR: &str = "table.searchResult tr";
const LINK_SELECTOR: &str = "a.prominent";
const BRAND_SELECTOR: &str = "a.brand";
const SUMMARY_SELECTOR: &str = "div.smallText";

/// Patterns for the row summary, e.g.
/// "por 100g - Calorias: 212kcal | Gord: 10,85g | Carbs: 0,00g | Prot: 26,77g"
struct MacroPatterns {
    calories: Option<Regex>,
    fat: Option<Regex>,
    carbs: Option<Regex>,
    protein: Option<Regex>,
}

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| tracing::error!("regex compile error for '{}': {}", pattern, e))
        .ok()
}

static MACRO_PATTERNS: LazyLock<MacroPatterns> = LazyLock::new(|| MacroPatterns {
    calories: compile(r"(?i)calorias:\s*([\d.,]+)\s*kcal"),
    fat: compile(r"(?i)gord:\s*([\d.,]+)\s*g"),
    carbs: compile(r"(?i)carbs:\s*([\d.,]+)\s*g"),
    protein: compile(r"(?i)prot:\s*([\d.,]+)\s*g"),
});

/// Extract the number captured by `pattern`, 0 when it doesn't match
fn capture(pattern: Option<&Regex>, text: &str) -> f64 {
    pattern
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| parse_decimal(m.as_str()))
        .unwrap_or(0.0)
}

/// Resolve an href against the source host
pub fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

fn parse_row(row: &Node<'_>, base_url: &str, patterns: &MacroPatterns) -> Option<SearchCandidate> {
    // Header and ad rows have no primary link
    let link = row.first(LINK_SELECTOR)?;
    let href = link.attr("href")?;

    let brand = row
        .first(BRAND_SELECTOR)
        .map(|b| {
            b.text()
                .trim()
                .trim_start_matches('(')
                .trim_end_matches(')')
                .trim()
                .to_string()
        })
        .filter(|b| !b.is_empty());

    let summary = row.first(SUMMARY_SELECTOR).map(|s| s.text()).unwrap_or_default();

    Some(SearchCandidate {
        name: link.text(),
        brand,
        url: absolute_url(base_url, href),
        calories: capture(patterns.calories.as_ref(), &summary),
        fat: capture(patterns.fat.as_ref(), &summary),
        carbs: capture(patterns.carbs.as_ref(), &summary),
        protein: capture(patterns.protein.as_ref(), &summary),
    })
}

/// Parse a search results page into at most [`MAX_CANDIDATES`] candidates, in
/// document order. Relative links resolve against `base_url`.
pub fn extract_candidates(html: &str, base_url: &str) -> Vec<SearchCandidate> {
    let page = Page::parse(html);
    page.select(ROW_SELECTOR)
        .iter()
        .filter_map(|row| parse_row(row, base_url, &MACRO_PATTERNS))
        .take(MAX_CANDIDATES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.fatsecret.com.br";
    const FIXTURE: &str = include_str!("../../tests/fixtures/search_carne_moida.html");

    fn row(name: &str, summary: &str) -> String {
        format!(
            r#"<tr><td><a class="prominent" href="/calorias-nutrição/genérico/{0}">{0}</a>
               <div class="smallText">{1}</div></td></tr>"#,
            name, summary
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            r#"<html><body><table class="generic searchResult">{}</table></body></html>"#,
            rows.concat()
        )
    }

    #[test]
    fn test_macro_patterns_compile() {
        let p = &*MACRO_PATTERNS;
        assert!(p.calories.is_some() && p.fat.is_some());
        assert!(p.carbs.is_some() && p.protein.is_some());
    }

    #[test]
    fn test_fixture_values() {
        let candidates = extract_candidates(FIXTURE, BASE);
        assert!(candidates.len() >= 2);

        let first = &candidates[0];
        assert_eq!(first.name, "Carne Moída Refogada");
        assert_eq!(first.calories, 212.0);
        assert_eq!(first.fat, 10.85);
        assert_eq!(first.carbs, 0.0);
        assert_eq!(first.protein, 26.77);

        let second = &candidates[1];
        assert_eq!(second.name, "Carne Moída");
        assert_eq!(second.calories, 156.0);
        assert_eq!(second.protein, 20.7);
        assert_eq!(
            second.url,
            "https://www.fatsecret.com.br/calorias-nutrição/genérico/carne-moída"
        );
        assert_eq!(second.brand, None);
    }

    #[test]
    fn test_fixture_skips_rows_without_link() {
        let candidates = extract_candidates(FIXTURE, BASE);
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().all(|c| !c.name.is_empty()));
    }

    #[test]
    fn test_brand_parentheses_stripped() {
        let candidates = extract_candidates(FIXTURE, BASE);
        let branded = candidates.iter().find(|c| c.brand.is_some()).unwrap();
        assert_eq!(branded.brand.as_deref(), Some("Friboi"));
    }

    #[test]
    fn test_document_order_and_count() {
        let rows: Vec<String> = (1..=5)
            .map(|i| row(&format!("food-{}", i), &format!("Calorias: {}kcal | Prot: 1,5g", i * 10)))
            .collect();
        let candidates = extract_candidates(&page(&rows), BASE);

        assert_eq!(candidates.len(), 5);
        for (i, c) in candidates.iter().enumerate() {
            assert_eq!(c.name, format!("food-{}", i + 1));
            assert_eq!(c.calories, ((i + 1) * 10) as f64);
            assert_eq!(c.protein, 1.5);
            assert!(c.fat >= 0.0 && c.carbs >= 0.0);
        }
    }

    #[test]
    fn test_capped_at_ten() {
        let rows: Vec<String> = (1..=14).map(|i| row(&format!("food-{}", i), "")).collect();
        let candidates = extract_candidates(&page(&rows), BASE);
        assert_eq!(candidates.len(), MAX_CANDIDATES);
        assert_eq!(candidates[9].name, "food-10");
    }

    #[test]
    fn test_missing_macros_are_zero() {
        let rows = vec![row("mystery", "sem informação")];
        let candidates = extract_candidates(&page(&rows), BASE);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].calories, 0.0);
        assert_eq!(candidates[0].fat, 0.0);
        assert_eq!(candidates[0].carbs, 0.0);
        assert_eq!(candidates[0].protein, 0.0);
    }

    #[test]
    fn test_unrelated_html() {
        assert!(extract_candidates("", BASE).is_empty());
        assert!(extract_candidates("<p>Nenhum resultado</p>", BASE).is_empty());
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url(BASE, "/a/b"), "https://www.fatsecret.com.br/a/b");
        assert_eq!(absolute_url("https://h.com/", "a"), "https://h.com/a");
        assert_eq!(absolute_url(BASE, "https://other.com/x"), "https://other.com/x");
        assert_eq!(absolute_url(BASE, "//cdn.com/x"), "https://cdn.com/x");
    }
}
