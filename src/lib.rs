//! # Meeple Engine
//!
//! Board-game discovery engine with:
//! - Weighted relevance ranking over free-text queries and structured filters
//! - Multi-factor similarity scoring with human-readable match reasons
//! - Debounced, throttled, cancellable search orchestration with
//!   infinite-scroll pagination
//! - Pluggable catalog providers (remote paginated endpoint, in-memory set)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use meeple_engine::{demo, providers::StaticCatalogProvider, SearchOrchestrator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = Arc::new(StaticCatalogProvider::new(demo::demo_catalog()));
//!     let orchestrator = SearchOrchestrator::new(provider);
//!     let mut updates = orchestrator.subscribe();
//!
//!     orchestrator.start();
//!     orchestrator.set_query("catan");
//!
//!     while updates.changed().await.is_ok() {
//!         let snapshot = updates.borrow_and_update().clone();
//!         if !snapshot.loading {
//!             for game in snapshot.ranked() {
//!                 println!("{}", game.display_name());
//!             }
//!             break;
//!         }
//!     }
//! }
//! ```

pub mod cache;
pub mod core;
pub mod demo;
pub mod error;
pub mod orchestrator;
pub mod providers;
pub mod ranking;
pub mod similarity;

// Re-export primary types
pub use crate::core::{
    Game, GameStats, Interval, SearchPage, SearchRequest, TimeBucket, Weight, TIME_BUCKETS,
};
pub use cache::{MemoryPageCache, PageCache};
pub use error::{DiscoveryError, Result};
pub use orchestrator::{SearchOrchestrator, SearchSnapshot, Timing};
pub use providers::{CatalogProvider, HttpCatalogProvider, StaticCatalogProvider};
pub use ranking::{rank, Filters, SortMode};
pub use similarity::{rank_similar, score_similarity, ScoredResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
