//! HTML scraping module
//!
//! All knowledge of the data source's markup lives here: the search results
//! page and the food detail page.

pub mod detail;
pub mod dom;
pub mod number;
pub mod search;

pub use detail::{extract_nutrients, extract_serving_context, ServingContext};
pub use number::parse_decimal;
pub use search::{absolute_url, extract_candidates, MAX_CANDIDATES};
