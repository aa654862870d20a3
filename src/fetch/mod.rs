use async_trait::async_trait;

pub mod decode;
pub mod http;

pub use decode::{classify, QuoteRecord};
pub use http::HttpQuoteApi;

/// Raw outcome of one remote quote call, before classification.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub success: bool,
    pub body: String,
}

/// The remote quote endpoint as the dispatch core sees it.
///
/// Implementations never fail: transport problems are folded into a
/// non-success `ApiResponse`, so a worker has no error path to handle.
#[async_trait]
pub trait QuoteApi: Send + Sync {
    async fn query(&self, symbol: &str) -> ApiResponse;
}
