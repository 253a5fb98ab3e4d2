use async_trait::async_trait;

use crate::core::{Game, SearchPage, SearchRequest};
use crate::error::Result;
use crate::providers::CatalogProvider;

/// In-memory catalog provider.
///
/// Applies the same server-side semantics as the remote endpoint: name
/// matching for search requests, then structured filters (player count
/// within range, weight equality, time-range intersection, tag-set
/// intersection), then pagination.
pub struct StaticCatalogProvider {
    games: Vec<Game>,
}

impl StaticCatalogProvider {
    pub fn new(games: Vec<Game>) -> Self {
        Self { games }
    }

    fn matches(game: &Game, request: &SearchRequest) -> bool {
        if request.is_search() {
            let q = request.query.to_lowercase();
            if !game.name.to_lowercase().contains(&q) {
                return false;
            }
        }

        if let Some(players) = request.players {
            if !game.players.contains(players) {
                return false;
            }
        }

        if let Some(weight) = request.weight {
            if game.weight != weight {
                return false;
            }
        }

        if let Some(window) = request.time {
            if !game.time.overlaps(&window) {
                return false;
            }
        }

        if !request.tags.is_empty() {
            let any_tag = request
                .tags
                .iter()
                .any(|t| game.tags.iter().any(|gt| gt.eq_ignore_ascii_case(t)));
            if !any_tag {
                return false;
            }
        }

        true
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalogProvider {
    async fn fetch(&self, request: &SearchRequest) -> Result<SearchPage> {
        let filtered: Vec<Game> = self
            .games
            .iter()
            .filter(|game| Self::matches(game, request))
            .cloned()
            .collect();

        let limit = request.limit.max(1);
        let page = request.page.max(1);
        let total = filtered.len() as u64;
        let pages = (total.div_ceil(u64::from(limit))) as u32;

        let start = ((page - 1) * limit) as usize;
        let results: Vec<Game> = filtered
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();

        tracing::debug!(
            "static catalog: {} of {} results for {}",
            results.len(),
            total,
            request.cache_key()
        );

        Ok(SearchPage {
            results,
            total,
            pages,
            page,
            limit,
        })
    }

    fn name(&self) -> &str {
        "static"
    }

    async fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{TimeBucket, Weight};
    use crate::demo;

    fn provider() -> StaticCatalogProvider {
        StaticCatalogProvider::new(demo::demo_catalog())
    }

    #[test]
    fn test_trending_returns_everything() {
        let page = tokio_test::block_on(provider().fetch(&SearchRequest::default())).unwrap();
        assert_eq!(page.total, 12);
        assert_eq!(page.pages, 1);
        assert_eq!(page.results.len(), 12);
    }

    #[tokio::test]
    async fn test_search_matches_name_substring() {
        let request = SearchRequest {
            query: "mars".to_string(),
            ..Default::default()
        };
        let page = provider().fetch(&request).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0].id, "terraforming-mars");
    }

    #[tokio::test]
    async fn test_player_and_weight_filters() {
        let request = SearchRequest {
            players: Some(7),
            ..Default::default()
        };
        let page = provider().fetch(&request).await.unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, "7wonders");

        let request = SearchRequest {
            weight: Some(Weight::Heavy),
            ..Default::default()
        };
        let page = provider().fetch(&request).await.unwrap();
        assert!(page.results.iter().all(|g| g.weight == Weight::Heavy));
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn test_time_bucket_filter_uses_intersection() {
        let request = SearchRequest {
            time: TimeBucket::find("u30").map(|b| b.interval()),
            ..Default::default()
        };
        let page = provider().fetch(&request).await.unwrap();
        // No demo game dips under 30 minutes
        assert_eq!(page.total, 0);
        assert!(page.results.is_empty());
    }

    #[tokio::test]
    async fn test_tag_filter_any_match() {
        let request = SearchRequest {
            tags: vec!["co-op".to_string()],
            ..Default::default()
        };
        let page = provider().fetch(&request).await.unwrap();
        let ids: Vec<&str> = page.results.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["gloomhaven", "pandemic"]);
    }

    #[tokio::test]
    async fn test_pagination_slices() {
        let request = SearchRequest {
            limit: 5,
            page: 3,
            ..Default::default()
        };
        let page = provider().fetch(&request).await.unwrap();
        assert_eq!(page.total, 12);
        assert_eq!(page.pages, 3);
        assert_eq!(page.results.len(), 2);

        let request = SearchRequest {
            limit: 5,
            page: 9,
            ..Default::default()
        };
        let page = provider().fetch(&request).await.unwrap();
        assert!(page.results.is_empty());
    }
}
