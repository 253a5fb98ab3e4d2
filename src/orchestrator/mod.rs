//! Search/pagination orchestration.
//!
//! Mediates between rapid input changes and the paginated catalog
//! endpoint: debounces bursts of changes, enforces a minimum spacing
//! between requests, cancels superseded requests so only the latest
//! response ever lands, and accumulates pages for infinite scroll.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::core::{Game, SearchPage, SearchRequest, TimeBucket, Weight};
use crate::providers::CatalogProvider;
use crate::ranking::{self, Filters, SortMode};

/// Page size requested from the catalog endpoint
const PAGE_LIMIT: u32 = 20;

/// Timing knobs for one search flow
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// Minimum quiet period after an input change before a request fires
    pub debounce: Duration,
    /// Window reserved per request; early responses wait out the remainder
    pub request_window: Duration,
    /// Slot reserved when a scroll trigger advances the page
    pub scroll_cooldown: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
            request_window: Duration::from_secs(3),
            scroll_cooldown: Duration::from_secs(5),
        }
    }
}

/// Observable state of a search flow
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub query: String,
    pub tags: Vec<String>,
    pub time: Option<TimeBucket>,
    pub players: Option<u32>,
    pub weight: Option<Weight>,
    pub sort: SortMode,
    /// Current 1-based page
    pub page: u32,
    /// Accumulated results across loaded pages
    pub results: Vec<Game>,
    pub total: u64,
    pub pages: u32,
    pub limit: u32,
    pub loading: bool,
    pub error: Option<String>,
}

impl SearchSnapshot {
    /// Accumulated results passed through the ranker
    pub fn ranked(&self) -> Vec<Game> {
        let filters = Filters {
            players: self.players,
            time: self.time,
            weight: self.weight,
            sort: self.sort,
        };
        ranking::rank(&self.results, &self.query, &filters)
    }

    /// Sorted distinct tags across current results
    pub fn available_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .results
            .iter()
            .flat_map(|g| g.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Pages believed to exist, falling back through server count, total
    /// count and finally "unbounded while results keep coming"
    pub fn effective_pages(&self) -> u32 {
        effective_page_count(self.pages, self.total, self.results.len(), self.limit)
    }
}

fn effective_page_count(pages: u32, total: u64, shown: usize, limit: u32) -> u32 {
    if pages > 0 {
        pages
    } else if total > 0 {
        total.div_ceil(u64::from(limit.max(1))) as u32
    } else if shown > 0 {
        u32::MAX
    } else {
        1
    }
}

struct FlowState {
    query: String,
    tags: BTreeSet<String>,
    time: Option<TimeBucket>,
    players: Option<u32>,
    weight: Option<Weight>,
    sort: SortMode,
    page: u32,
    results: Vec<Game>,
    total: u64,
    pages: u32,
    loading: bool,
    error: Option<String>,
    /// Cancellation token: only the task holding the current value may
    /// mutate result state
    generation: u64,
    /// Earliest instant the next request slot opens
    next_allowed_at: Option<Instant>,
    /// One-shot latch for server-provided initial results
    initial_results_unused: bool,
    pending: Option<JoinHandle<()>>,
}

impl FlowState {
    fn new() -> Self {
        Self {
            query: String::new(),
            tags: BTreeSet::new(),
            time: None,
            players: None,
            weight: None,
            sort: SortMode::Relevance,
            page: 1,
            results: Vec::new(),
            total: 0,
            pages: 0,
            loading: false,
            error: None,
            generation: 0,
            next_allowed_at: None,
            initial_results_unused: false,
            pending: None,
        }
    }

    fn snapshot(&self, limit: u32) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            tags: self.tags.iter().cloned().collect(),
            time: self.time,
            players: self.players,
            weight: self.weight,
            sort: self.sort,
            page: self.page,
            results: self.results.clone(),
            total: self.total,
            pages: self.pages,
            limit,
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    fn is_default_filters(&self) -> bool {
        self.query.trim().is_empty()
            && self.tags.is_empty()
            && self.time.is_none()
            && self.players.is_none()
            && self.weight.is_none()
    }

    fn effective_pages(&self, limit: u32) -> u32 {
        effective_page_count(self.pages, self.total, self.results.len(), limit)
    }

    fn build_request(&self, limit: u32) -> SearchRequest {
        SearchRequest {
            query: self.query.trim().to_string(),
            page: self.page,
            limit,
            players: self.players,
            weight: self.weight,
            time: self.time.map(|b| b.interval()),
            tags: self.tags.iter().cloned().collect(),
        }
    }
}

struct Inner {
    provider: Arc<dyn CatalogProvider>,
    timing: Timing,
    limit: u32,
    state: Mutex<FlowState>,
    updates: watch::Sender<SearchSnapshot>,
}

impl Inner {
    fn publish(&self, state: &FlowState) {
        let _ = self.updates.send_replace(state.snapshot(self.limit));
    }
}

/// One orchestrator instance per active search flow.
///
/// Owns its cancellation generation, pending timer task, throttle
/// deadline and hydration latch; dropping it (or calling [`shutdown`])
/// aborts any timer or request still pending so nothing fires against a
/// torn-down flow.
///
/// [`shutdown`]: SearchOrchestrator::shutdown
pub struct SearchOrchestrator {
    inner: Arc<Inner>,
}

impl SearchOrchestrator {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self::with_timing(provider, Timing::default())
    }

    pub fn with_timing(provider: Arc<dyn CatalogProvider>, timing: Timing) -> Self {
        Self::build(provider, timing, None)
    }

    /// Start from a pre-populated default-filter page-1 result set.
    ///
    /// The first fetch that would duplicate the supplied payload is
    /// skipped, exactly once per flow lifetime.
    pub fn hydrated(
        provider: Arc<dyn CatalogProvider>,
        timing: Timing,
        initial: SearchPage,
    ) -> Self {
        Self::build(provider, timing, Some(initial))
    }

    fn build(
        provider: Arc<dyn CatalogProvider>,
        timing: Timing,
        initial: Option<SearchPage>,
    ) -> Self {
        let mut state = FlowState::new();
        if let Some(initial) = initial {
            state.results = initial.results;
            state.total = initial.total;
            state.pages = initial.pages;
            state.initial_results_unused = true;
        }
        let (updates, _) = watch::channel(state.snapshot(PAGE_LIMIT));
        Self {
            inner: Arc::new(Inner {
                provider,
                timing,
                limit: PAGE_LIMIT,
                state: Mutex::new(state),
                updates,
            }),
        }
    }

    /// Subscribe to state snapshots
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.inner.updates.subscribe()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.state.lock().unwrap().snapshot(self.inner.limit)
    }

    /// Current results through the ranker, the way a result view shows them
    pub fn ranked_results(&self) -> Vec<Game> {
        self.snapshot().ranked()
    }

    /// Kick off the initial fetch for the flow
    pub fn start(&self) {
        self.schedule_fetch();
    }

    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.filter_change(move |state| {
            if state.query == query {
                false
            } else {
                state.query = query;
                true
            }
        });
    }

    /// Target player count, clamped to 1..=20
    pub fn set_players(&self, players: Option<u32>) {
        let players = players.map(|p| p.clamp(1, 20));
        self.filter_change(move |state| {
            if state.players == players {
                false
            } else {
                state.players = players;
                true
            }
        });
    }

    pub fn set_weight(&self, weight: Option<Weight>) {
        self.filter_change(move |state| {
            if state.weight == weight {
                false
            } else {
                state.weight = weight;
                true
            }
        });
    }

    /// Select a play-time bucket by id; unknown ids are ignored
    pub fn set_time_bucket(&self, id: Option<&str>) {
        let bucket = match id {
            Some(id) => match TimeBucket::find(id) {
                Some(bucket) => Some(bucket),
                None => {
                    tracing::warn!("unknown time bucket id: {}", id);
                    return;
                }
            },
            None => None,
        };
        self.filter_change(move |state| {
            if state.time == bucket {
                false
            } else {
                state.time = bucket;
                true
            }
        });
    }

    pub fn toggle_tag(&self, tag: &str) {
        let tag = tag.to_string();
        self.filter_change(move |state| {
            if !state.tags.remove(&tag) {
                state.tags.insert(tag);
            }
            true
        });
    }

    /// Change the sort mode. Re-ranks locally only: sorting is applied to
    /// the accumulated results, so no fetch is scheduled and pagination
    /// stays where it is.
    pub fn set_sort(&self, sort: SortMode) {
        let mut state = self.inner.state.lock().unwrap();
        if state.sort != sort {
            state.sort = sort;
            self.inner.publish(&state);
        }
    }

    /// Reset query, filters and sort to their defaults
    pub fn clear_filters(&self) {
        let fetch_needed;
        {
            let mut state = self.inner.state.lock().unwrap();
            let filters_changed = !state.is_default_filters() || state.page != 1;
            let sort_changed = state.sort != SortMode::Relevance;

            state.query.clear();
            state.tags.clear();
            state.time = None;
            state.players = None;
            state.weight = None;
            state.sort = SortMode::Relevance;

            fetch_needed = filters_changed;
            if filters_changed {
                state.page = 1;
                state.next_allowed_at = None;
            } else if sort_changed {
                self.inner.publish(&state);
            }
        }
        if fetch_needed {
            self.schedule_fetch();
        }
    }

    /// Infinite-scroll trigger: the sentinel element came within range.
    ///
    /// Advances the page only when nothing is loading, more pages remain
    /// and the cooldown slot has elapsed; the next slot is reserved
    /// optimistically so rapid triggers advance at most one page.
    pub fn notify_sentinel(&self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            if state.loading {
                return;
            }
            if state.page >= state.effective_pages(self.inner.limit) {
                return;
            }
            let now = Instant::now();
            if let Some(at) = state.next_allowed_at {
                if now < at {
                    return;
                }
            }
            state.next_allowed_at = Some(now + self.inner.timing.scroll_cooldown);
            state.page += 1;
        }
        self.schedule_fetch();
    }

    /// Tear the flow down: no pending timer or in-flight request will
    /// touch state after this returns
    pub fn shutdown(&self) {
        let mut state = self.inner.state.lock().unwrap();
        state.generation += 1;
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }
    }

    fn filter_change<F>(&self, apply: F)
    where
        F: FnOnce(&mut FlowState) -> bool,
    {
        {
            let mut state = self.inner.state.lock().unwrap();
            if !apply(&mut *state) {
                return;
            }
            // Any filter/query change restarts pagination and frees the
            // throttle slot
            state.page = 1;
            state.next_allowed_at = None;
        }
        self.schedule_fetch();
    }

    fn schedule_fetch(&self) {
        let mut state = self.inner.state.lock().unwrap();

        // One-shot bypass: the flow began with server-provided results for
        // exactly this request, so the first matching fetch is redundant
        if state.initial_results_unused
            && state.page == 1
            && state.is_default_filters()
            && !state.results.is_empty()
            && state.total > 0
        {
            state.initial_results_unused = false;
            tracing::debug!("consuming server-provided initial results, skipping fetch");
            self.inner.publish(&state);
            return;
        }

        state.generation += 1;
        let generation = state.generation;
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }
        state.loading = true;
        state.error = None;

        let throttle = state
            .next_allowed_at
            .map(|at| at.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::ZERO);
        let delay = self.inner.timing.debounce.max(throttle);
        let request = state.build_request(self.inner.limit);
        self.inner.publish(&state);

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(run_fetch(inner, generation, request, delay));
        state.pending = Some(handle);
    }
}

impl Drop for SearchOrchestrator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_fetch(inner: Arc<Inner>, generation: u64, request: SearchRequest, delay: Duration) {
    tokio::time::sleep(delay).await;

    let window_ends;
    {
        let mut state = inner.state.lock().unwrap();
        if state.generation != generation {
            return;
        }
        // Reserve the response window before going to the network
        window_ends = Instant::now() + inner.timing.request_window;
        state.next_allowed_at = Some(window_ends);
    }

    tracing::debug!(
        "fetching page {} from {} ({})",
        request.page,
        inner.provider.name(),
        request.cache_key()
    );
    let outcome = inner.provider.fetch(&request).await;

    // A fast response waits out the reserved window before being applied,
    // capping the effective request rate against the backing service
    if outcome.is_ok() {
        tokio::time::sleep_until(window_ends).await;
    }

    let mut state = inner.state.lock().unwrap();
    if state.generation != generation {
        // Superseded while in flight; the stale response is dropped
        return;
    }

    match outcome {
        Ok(page) => {
            state.total = page.total;
            state.pages = page.pages;
            if request.page > 1 {
                state.results.extend(page.results);
            } else {
                state.results = page.results;
            }
            state.loading = false;
            tracing::debug!(
                "applied page {}: {} shown of {} total",
                request.page,
                state.results.len(),
                state.total
            );
        }
        Err(e) => {
            tracing::warn!("fetch for page {} failed: {}", request.page, e);
            state.error = Some(e.to_string());
            if request.page == 1 {
                state.results.clear();
            }
            state.loading = false;
        }
    }
    state.pending = None;
    inner.publish(&state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Game;

    #[test]
    fn test_timing_defaults() {
        let timing = Timing::default();
        assert_eq!(timing.debounce, Duration::from_millis(250));
        assert_eq!(timing.request_window, Duration::from_secs(3));
        assert_eq!(timing.scroll_cooldown, Duration::from_secs(5));
    }

    #[test]
    fn test_effective_page_count_fallbacks() {
        // Server-provided page count wins
        assert_eq!(effective_page_count(7, 500, 20, 20), 7);
        // Derived from total when the server count is missing
        assert_eq!(effective_page_count(0, 45, 20, 20), 3);
        // Unbounded while results are present but totals unknown
        assert_eq!(effective_page_count(0, 0, 20, 20), u32::MAX);
        // Nothing at all: a single page
        assert_eq!(effective_page_count(0, 0, 0, 20), 1);
    }

    #[test]
    fn test_default_filters_detection() {
        let mut state = FlowState::new();
        assert!(state.is_default_filters());

        state.query = "   ".to_string();
        assert!(state.is_default_filters());

        state.players = Some(4);
        assert!(!state.is_default_filters());
    }

    #[test]
    fn test_snapshot_available_tags() {
        let mut state = FlowState::new();
        let mut a = Game::new("a", "A");
        a.tags = vec!["family".to_string(), "dice".to_string()];
        let mut b = Game::new("b", "B");
        b.tags = vec!["dice".to_string(), "co-op".to_string()];
        state.results = vec![a, b];

        let snapshot = state.snapshot(20);
        assert_eq!(snapshot.available_tags(), vec!["co-op", "dice", "family"]);
    }

    #[test]
    fn test_build_request_trims_query() {
        let mut state = FlowState::new();
        state.query = "  catan  ".to_string();
        state.tags.insert("family".to_string());
        let request = state.build_request(20);
        assert_eq!(request.query, "catan");
        assert_eq!(request.tags, vec!["family"]);
        assert_eq!(request.page, 1);
    }
}
