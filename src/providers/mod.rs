pub mod http;
pub mod static_catalog;

use async_trait::async_trait;

use crate::core::{SearchPage, SearchRequest};
use crate::error::Result;

pub use http::HttpCatalogProvider;
pub use static_catalog::StaticCatalogProvider;

/// Trait for catalog page sources (remote search API, in-memory set, etc.)
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch one page of results for a request
    async fn fetch(&self, request: &SearchRequest) -> Result<SearchPage>;

    /// Get provider name
    fn name(&self) -> &str;

    /// Check if provider is available
    async fn is_available(&self) -> bool;
}
