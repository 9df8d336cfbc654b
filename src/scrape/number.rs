//! Locale-aware number parsing
//!
//! The source pages use Brazilian formatting: comma as the decimal separator,
//! dot as the thousands separator ("1.234,5").

/// Parse the first number found in `text`. Anything unparsable is 0.
///
/// Examples:
/// - "20,7g" -> 20.7
/// - "3,154 g" -> 3.154
/// - "1.234,5 kj" -> 1234.5
/// - "1.046 kj" -> 1046.0
/// - "156 kcal" -> 156.0
/// - "-" -> 0.0
pub fn parse_decimal(text: &str) -> f64 {
    let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
        return 0.0;
    };

    let token: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    let token = token.trim_end_matches([',', '.']);

    let normalized = if token.contains(',') || is_grouped_thousands(token) {
        token.replace('.', "").replace(',', ".")
    } else {
        token.to_string()
    };

    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

/// "1.046", "12.500.000": dots only, every group after the first exactly
/// three digits
fn is_grouped_thousands(token: &str) -> bool {
    let mut groups = token.split('.');
    let lead = groups.next().unwrap_or_default();
    let mut rest = groups.peekable();

    rest.peek().is_some()
        && (1..=3).contains(&lead.len())
        && rest.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}
