use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meeple_engine::{
    demo,
    providers::{CatalogProvider, StaticCatalogProvider},
    similarity, Game, Interval, SearchPage, SearchRequest, Weight,
};

#[derive(Clone)]
struct AppState {
    provider: Arc<StaticCatalogProvider>,
    games: Arc<Vec<Game>>,
}

/// Query parameters accepted by the listing endpoints
#[derive(Debug, Deserialize)]
struct ListParams {
    q: Option<String>,
    limit: Option<u32>,
    page: Option<u32>,
    players: Option<u32>,
    weight: Option<String>,
    min_time: Option<u32>,
    max_time: Option<u32>,
    tags: Option<String>,
}

impl ListParams {
    fn into_request(self, with_query: bool) -> SearchRequest {
        let query = if with_query {
            self.q.unwrap_or_default().trim().to_string()
        } else {
            String::new()
        };

        // Unrecognized weight values are dropped rather than rejected
        let weight = self
            .weight
            .as_deref()
            .and_then(|w| w.parse::<Weight>().ok());

        let time = match (self.min_time, self.max_time) {
            (None, None) => None,
            (min, max) => Some(Interval::new(min.unwrap_or(0), max.unwrap_or(999_999))),
        };

        let tags: Vec<String> = self
            .tags
            .unwrap_or_default()
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        SearchRequest {
            query,
            page: self.page.unwrap_or(1).clamp(1, 100),
            limit: self.limit.unwrap_or(20).clamp(1, 50),
            players: self.players,
            weight,
            time,
            tags,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "discovery_server=debug,meeple_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8090);

    tracing::info!("🎲 Starting Board-Game Discovery Server");
    tracing::info!("🔌 Port: {}", port);

    let games = demo::demo_catalog();
    let state = AppState {
        provider: Arc::new(StaticCatalogProvider::new(games.clone())),
        games: Arc::new(games),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/bgg/hot", get(hot_handler))
        .route("/api/bgg/search", get(search_handler))
        .route("/api/bgg/similar/:id", get(similar_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("🎮 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: meeple_engine::VERSION.to_string(),
    })
}

async fn hot_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<SearchPage>, AppError> {
    let request = params.into_request(false);
    let page = state.provider.fetch(&request).await?;
    Ok(Json(page))
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<SearchPage>, AppError> {
    let request = params.into_request(true);
    if !request.is_search() {
        // Empty query text yields an empty page, not an error
        return Ok(Json(SearchPage::default()));
    }

    let page = state.provider.fetch(&request).await?;
    tracing::debug!("search '{}' -> {} results", request.query, page.total);
    Ok(Json(page))
}

async fn similar_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<similarity::ScoredResult>>, AppError> {
    let base = state
        .games
        .iter()
        .find(|g| g.id == id)
        .ok_or_else(|| meeple_engine::DiscoveryError::NoResults(id.clone()))?;

    Ok(Json(similarity::rank_similar(base, &state.games)))
}

// Error handling
struct AppError(meeple_engine::DiscoveryError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            meeple_engine::DiscoveryError::NoResults(id) => {
                (StatusCode::NOT_FOUND, format!("Unknown game: {}", id))
            }
            meeple_engine::DiscoveryError::Provider { provider, message } => (
                StatusCode::BAD_GATEWAY,
                format!("Provider '{}' error: {}", provider, message),
            ),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        tracing::error!("❌ Error: {} - {}", status, message);

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<meeple_engine::DiscoveryError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
