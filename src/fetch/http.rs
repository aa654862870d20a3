use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};

use super::{ApiResponse, QuoteApi};

const API_KEY_VAR: &str = "XAPIKEY";

/// reqwest-backed quote client hitting the configured endpoint.
pub struct HttpQuoteApi {
    client: Client,
    base_url: String,
    params: HashMap<String, String>,
    api_key: String,
}

impl HttpQuoteApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
            AppError::message(format!(
                "Environment variable {} required by the quote API is not set",
                API_KEY_VAR
            ))
        })?;

        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            params: config.params.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl QuoteApi for HttpQuoteApi {
    async fn query(&self, symbol: &str) -> ApiResponse {
        let request = self
            .client
            .get(&self.base_url)
            .query(&self.params)
            .query(&[("symbols", symbol)])
            .header("x-api-key", &self.api_key);

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let success = response.status().is_success();
                let body = response.text().await.unwrap_or_default();
                ApiResponse {
                    status,
                    success,
                    body,
                }
            }
            // Transport errors classify like any other bad status; a worker
            // must never see an error escape this call.
            Err(e) => ApiResponse {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                success: false,
                body: e.to_string(),
            },
        }
    }
}
