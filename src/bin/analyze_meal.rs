//! Analyze a meal from the command line and print the result as JSON
//!
//! Usage: analyze_meal "arroz branco:1 prato" "feijão carioca:1 concha" "banana"

use tracing_subscriber::EnvFilter;

use prato::config::Config;
use prato::models::MealItemRequest;

/// `food[:serving]`
fn parse_item(arg: &str) -> MealItemRequest {
    match arg.split_once(':') {
        Some((food, serving)) => MealItemRequest::new(food.trim(), Some(serving.trim())),
        None => MealItemRequest::new(arg.trim(), None),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("prato=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let items: Vec<MealItemRequest> = std::env::args()
        .skip(1)
        .filter(|a| !a.trim().is_empty())
        .map(|a| parse_item(&a))
        .collect();

    if items.is_empty() {
        eprintln!("Usage: analyze_meal \"food[:serving]\" ...");
        std::process::exit(2);
    }

    let analyzer = Config::from_env().analyzer()?;
    let result = analyzer.aggregate(&items).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
