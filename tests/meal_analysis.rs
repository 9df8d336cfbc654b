//! End-to-end meal analysis against fixture pages, saved to a real database

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use prato::analysis::{AnalysisError, AnalysisResult, Analyzer, FoodSource};
use prato::db::Database;
use prato::models::MealItemRequest;
use prato::oracle::{Oracle, OracleError, OracleRequest};
use prato::tools::{analysis, meal_logs};

const BASE: &str = "https://www.fatsecret.com.br";
const SEARCH: &str = include_str!("fixtures/search_carne_moida.html");
const DETAIL: &str = include_str!("fixtures/detail_carne_moida.html");

struct FixtureSource;

#[async_trait]
impl FoodSource for FixtureSource {
    fn base_url(&self) -> &str {
        BASE
    }

    async fn search(&self, query: &str) -> AnalysisResult<String> {
        match query {
            "carne moída" => Ok(SEARCH.to_string()),
            _ => Ok("<html><body><table class=\"searchResult\"></table></body></html>".to_string()),
        }
    }

    async fn fetch_page(&self, url: &str) -> AnalysisResult<String> {
        if url.starts_with(BASE) {
            Ok(DETAIL.to_string())
        } else {
            Err(AnalysisError::Fetch {
                url: url.to_string(),
                status: 404,
            })
        }
    }
}

/// Always picks option 2 and estimates 120g for any household measure
struct FixedOracle;

#[async_trait]
impl Oracle for FixedOracle {
    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        match request.tool_name {
            "select_food_item" => Ok(r#"{"foodItem": 2}"#.to_string()),
            "estimate_serving_grams" => Ok(r#"{"gramsAmount": 120}"#.to_string()),
            other => Err(OracleError::InvalidOutput(other.to_string())),
        }
    }
}

fn test_database(name: &str) -> (Database, PathBuf) {
    let path = std::env::temp_dir().join(format!("prato-{}-{}.db", name, std::process::id()));
    let _ = std::fs::remove_file(&path);
    let database = Database::open(&path).unwrap();
    (database, path)
}

fn analyzer() -> Analyzer {
    Analyzer::new(Arc::new(FixtureSource), Arc::new(FixedOracle))
}

#[tokio::test]
async fn test_meal_is_analyzed_saved_and_listed() {
    let (database, path) = test_database("saved");
    let items = vec![
        MealItemRequest::new("carne moída", Some("1 porção")),
        MealItemRequest::new("carne moída", Some("150g")),
    ];

    let response = analysis::analyze_meal(&analyzer(), &database, items, Some("almoço"), true)
        .await
        .unwrap();

    assert_eq!(response.result.item_count, 2);
    assert_eq!(response.result.items[0].matched_name, "Carne Moída");
    assert_eq!(response.result.items[0].grams, 120.0);
    assert_eq!(response.result.items[1].grams, 150.0);
    assert_eq!(response.result.total_grams, 270.0);
    // 156 * 1.2 + 156 * 1.5
    assert_eq!(response.result.totals.energy_kcal, 421.2);

    let id = response.meal_log_id.unwrap();
    let log = meal_logs::get_meal_log(&database, id).unwrap().unwrap();
    assert_eq!(log.description.as_deref(), Some("almoço"));
    assert_eq!(log.item_count, 2);
    assert_eq!(log.totals, response.result.totals);
    assert_eq!(log.items[1].serving_text.as_deref(), Some("150g"));

    let listed = meal_logs::list_meal_logs(&database, 20).unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.meals[0].id, id);

    drop(database);
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_unknown_food_fails_whole_meal_and_saves_nothing() {
    let (database, path) = test_database("unknown");
    let items = vec![
        MealItemRequest::new("carne moída", None),
        MealItemRequest::new("comida inexistente", None),
    ];

    let err = analysis::analyze_meal(&analyzer(), &database, items, None, true)
        .await
        .unwrap_err();
    assert!(err.contains("comida inexistente"));

    let listed = meal_logs::list_meal_logs(&database, 20).unwrap();
    assert_eq!(listed.total, 0);

    drop(database);
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_meal_without_save_has_no_log_id() {
    let (database, path) = test_database("unsaved");
    let items = vec![MealItemRequest::new("carne moída", None)];

    let response = analysis::analyze_meal(&analyzer(), &database, items, None, false)
        .await
        .unwrap();
    assert_eq!(response.meal_log_id, None);
    assert_eq!(response.result.totals.energy_kcal, 156.0);
    assert_eq!(response.result.totals.fat.total, 7.5);

    drop(database);
    let _ = std::fs::remove_file(path);
}
