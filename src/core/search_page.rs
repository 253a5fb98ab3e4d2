use serde::{Deserialize, Serialize};

use crate::core::{Game, Interval, Weight};

/// One page of catalog results as returned by the remote endpoint.
///
/// Every field is defaulted: a response missing counts or carrying nulls
/// degrades to zeros/empty rather than failing the fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchPage {
    #[serde(default)]
    pub results: Vec<Game>,

    /// Total matching games across all pages
    #[serde(default)]
    pub total: u64,

    /// Total page count, 0 when the server does not know
    #[serde(default)]
    pub pages: u32,

    /// 1-based page number this payload covers
    #[serde(default)]
    pub page: u32,

    #[serde(default)]
    pub limit: u32,
}

impl SearchPage {
    pub fn new(results: Vec<Game>, total: u64, pages: u32) -> Self {
        Self {
            results,
            total,
            pages,
            page: 1,
            limit: 20,
        }
    }
}

/// Parameters for one catalog request.
///
/// Renders the wire query string in a fixed order and picks the endpoint
/// variant from the query text: `/search` when text is present, the
/// trending `/hot` listing otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Trimmed query text; empty means the trending listing
    pub query: String,
    /// 1-based page
    pub page: u32,
    pub limit: u32,
    pub players: Option<u32>,
    pub weight: Option<Weight>,
    /// Play-time window, usually a selected bucket's bounds
    pub time: Option<Interval>,
    /// Selected tag labels; comma-joined on the wire
    pub tags: Vec<String>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            limit: 20,
            players: None,
            weight: None,
            time: None,
            tags: Vec::new(),
        }
    }
}

impl SearchRequest {
    pub fn is_search(&self) -> bool {
        !self.query.is_empty()
    }

    /// Endpoint path relative to the API base
    pub fn endpoint_path(&self) -> &'static str {
        if self.is_search() {
            "/search"
        } else {
            "/hot"
        }
    }

    /// Render the query string: limit, page, players, weight,
    /// min_time/max_time, tags, q; unset filters are omitted.
    pub fn query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = vec![
            ("limit", self.limit.to_string()),
            ("page", self.page.to_string()),
        ];
        if let Some(players) = self.players {
            pairs.push(("players", players.to_string()));
        }
        if let Some(weight) = self.weight {
            pairs.push(("weight", weight.as_str().to_string()));
        }
        if let Some(window) = self.time {
            pairs.push(("min_time", window.min.to_string()));
            pairs.push(("max_time", window.max.to_string()));
        }
        if !self.tags.is_empty() {
            pairs.push(("tags", self.tags.join(",")));
        }
        if self.is_search() {
            pairs.push(("q", self.query.clone()));
        }

        pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Full request URL against an API base like `http://host/api/bgg`
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}{}?{}",
            base_url.trim_end_matches('/'),
            self.endpoint_path(),
            self.query_string()
        )
    }

    /// Stable key for response caching
    pub fn cache_key(&self) -> String {
        format!("{}?{}", self.endpoint_path(), self.query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeBucket;

    #[test]
    fn test_default_request_is_trending() {
        let request = SearchRequest::default();
        assert!(!request.is_search());
        assert_eq!(request.endpoint_path(), "/hot");
        assert_eq!(request.query_string(), "limit=20&page=1");
    }

    #[test]
    fn test_full_query_string_order() {
        let request = SearchRequest {
            query: "catan".to_string(),
            page: 2,
            players: Some(4),
            weight: Some(Weight::Medium),
            time: TimeBucket::find("30-60").map(|b| b.interval()),
            tags: vec!["family".to_string(), "trading".to_string()],
            ..Default::default()
        };
        assert_eq!(request.endpoint_path(), "/search");
        assert_eq!(
            request.query_string(),
            "limit=20&page=2&players=4&weight=medium&min_time=30&max_time=60&tags=family%2Ctrading&q=catan"
        );
    }

    #[test]
    fn test_query_text_is_encoded() {
        let request = SearchRequest {
            query: "7 wonders".to_string(),
            ..Default::default()
        };
        assert!(request.query_string().ends_with("q=7%20wonders"));
    }

    #[test]
    fn test_url_joins_base() {
        let request = SearchRequest::default();
        assert_eq!(
            request.url("http://localhost:8090/api/bgg/"),
            "http://localhost:8090/api/bgg/hot?limit=20&page=1"
        );
    }

    #[test]
    fn test_page_deserialization_defaults() {
        let page: SearchPage = serde_json::from_str(r#"{"results":[{"id":"catan"}]}"#).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);

        let empty: SearchPage = serde_json::from_str("{}").unwrap();
        assert!(empty.results.is_empty());
    }
}
