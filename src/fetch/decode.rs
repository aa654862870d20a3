use serde_json::Value;

use super::ApiResponse;

/// Prefix shared by every failure note; the reporting layer keys on it.
pub const FAILURE_MARKER: &str = "FAILED";

/// Sentinel value carried by failure records in place of a quote.
pub const FAILURE_VALUE: f64 = -1.0;

/// Per-symbol outcome: an extracted quote, or a tagged failure reason.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    pub symbol: String,
    pub value: f64,
    pub note: String,
}

impl QuoteRecord {
    pub fn success(symbol: impl Into<String>, value: f64, label: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            value,
            note: label.into(),
        }
    }

    pub fn failure(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            value: FAILURE_VALUE,
            note: reason.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.note.starts_with(FAILURE_MARKER)
    }
}

/// Collapse a raw response into exactly one record for `symbol`.
///
/// Both batch strategies share these rules, so a symbol classifies the same
/// way no matter which strategy executed it.
pub fn classify(symbol: &str, response: &ApiResponse) -> QuoteRecord {
    if !response.success {
        return QuoteRecord::failure(symbol, format!("{} {}", FAILURE_MARKER, response.status));
    }

    let payload: Value = match serde_json::from_str(&response.body) {
        Ok(value) => value,
        Err(_) => return QuoteRecord::failure(symbol, format!("{} key error", FAILURE_MARKER)),
    };

    let results = match payload["quoteResponse"]["result"].as_array() {
        Some(list) => list,
        None => return QuoteRecord::failure(symbol, format!("{} key error", FAILURE_MARKER)),
    };

    let Some(first) = results.first() else {
        return QuoteRecord::failure(symbol, format!("{} empty response", FAILURE_MARKER));
    };

    match (
        first["regularMarketPreviousClose"].as_f64(),
        first["longName"].as_str(),
    ) {
        (Some(value), Some(name)) => QuoteRecord::success(symbol, value, name),
        _ => QuoteRecord::failure(symbol, format!("{} key error", FAILURE_MARKER)),
    }
}
