use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Context, Result};

/// Remote-endpoint settings plus the symbol list, loaded from a JSON file.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(rename = "params_for_api_request", default)]
    pub params: HashMap<String, String>,
    #[serde(alias = "list_of_api_requests")]
    pub symbols: Vec<String>,
}

impl ApiConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_with_original_field_names() {
        let raw = r#"{
            "base_url": "https://example.com/v6/finance/quote",
            "params_for_api_request": {"region": "US", "lang": "en"},
            "list_of_api_requests": ["AAPL", "MSFT"]
        }"#;

        let config: ApiConfig = serde_json::from_str(raw).expect("config parses");
        assert_eq!(config.base_url, "https://example.com/v6/finance/quote");
        assert_eq!(config.params.get("region").map(String::as_str), Some("US"));
        assert_eq!(config.symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn params_are_optional() {
        let raw = r#"{"base_url": "https://example.com", "symbols": ["AAPL"]}"#;
        let config: ApiConfig = serde_json::from_str(raw).expect("config parses");
        assert!(config.params.is_empty());
    }
}
