use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::cache::PageCache;
use crate::core::{SearchPage, SearchRequest};
use crate::error::{DiscoveryError, Result};
use crate::providers::CatalogProvider;

const PROVIDER_NAME: &str = "catalog-api";

/// Remote catalog provider speaking the paginated search/trending contract
pub struct HttpCatalogProvider {
    client: Client,
    base_url: String,
    cache: Option<Arc<dyn PageCache>>,
}

impl HttpCatalogProvider {
    /// Create a provider against an API base like `http://host/api/bgg`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(DiscoveryError::HttpRequest)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: None,
        })
    }

    /// Attach a response-page cache
    pub fn with_cache(mut self, cache: Arc<dyn PageCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    async fn fetch_remote(&self, request: &SearchRequest) -> Result<SearchPage> {
        let url = request.url(&self.base_url);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DiscoveryError::Provider {
                provider: PROVIDER_NAME.to_string(),
                message: format!("Request failed: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Provider {
                provider: PROVIDER_NAME.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let page: SearchPage = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Provider {
                provider: PROVIDER_NAME.to_string(),
                message: format!("Invalid JSON: {}", e),
            })?;

        Ok(page)
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn fetch(&self, request: &SearchRequest) -> Result<SearchPage> {
        let key = request.cache_key();

        if let Some(cache) = &self.cache {
            if let Some(page) = cache.get(&key).await {
                tracing::debug!("cache hit for {}", key);
                return Ok(page);
            }
        }

        let page = self.fetch_remote(request).await?;

        if let Some(cache) = &self.cache {
            cache.put(&key, &page).await;
        }

        Ok(page)
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn is_available(&self) -> bool {
        let probe = SearchRequest {
            limit: 1,
            ..Default::default()
        };
        self.fetch_remote(&probe).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let provider = HttpCatalogProvider::new("http://localhost:8090/api/bgg/").unwrap();
        assert_eq!(provider.base_url, "http://localhost:8090/api/bgg");
    }

    #[tokio::test]
    #[ignore] // Requires a running discovery-server
    async fn test_trending_fetch() {
        let provider = HttpCatalogProvider::new("http://127.0.0.1:8090/api/bgg").unwrap();
        let page = provider.fetch(&SearchRequest::default()).await.unwrap();
        assert!(!page.results.is_empty());
    }
}
