use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tomesphere_discovery_engine::{
    engine::{HybridSet, SearchOutcome},
    Book, DataService, DiscoveryEngine, Mood, RecommendationSet, RestDataService, SearchFilters,
    SqliteDataService, Suggestion,
};

#[derive(Clone)]
struct AppState {
    engine: Arc<DiscoveryEngine>,
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

#[derive(Debug, Deserialize)]
struct LimitParams {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
    q: String,
}

#[derive(Debug, Deserialize)]
struct MoodParams {
    mood: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "discovery_server=debug,tomesphere_discovery_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8090);

    // Hosted backend when configured, local snapshot otherwise
    let service: Arc<dyn DataService> = match (
        std::env::var("TOMESPHERE_URL"),
        std::env::var("TOMESPHERE_KEY"),
    ) {
        (Ok(url), Ok(key)) => {
            tracing::info!("Using hosted data service at {url}");
            Arc::new(RestDataService::new(url, key)?)
        }
        _ => {
            let db_path =
                std::env::var("DB_PATH").unwrap_or_else(|_| "tomesphere.db".to_string());
            tracing::info!("Using local snapshot at {db_path}");
            Arc::new(SqliteDataService::new(&db_path)?)
        }
    };

    let state = AppState {
        engine: Arc::new(DiscoveryEngine::new(service)),
    };

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/search", post(search_handler))
        .route("/v1/recommendations/:user_id", get(recommendations_handler))
        .route("/v1/recommendations/:user_id/hybrid", get(hybrid_handler))
        .route("/v1/trending", get(trending_handler))
        .route("/v1/related/:book_id", get(related_handler))
        .route("/v1/suggest", get(suggest_handler))
        .route("/v1/mood", get(mood_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("Discovery server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: tomesphere_discovery_engine::VERSION.to_string(),
    })
}

async fn search_handler(
    State(state): State<AppState>,
    Json(filters): Json<SearchFilters>,
) -> Result<Json<SearchOutcome>, AppError> {
    tracing::debug!("Search request: {:?}", filters);

    let outcome = state.engine.search(&filters).await?;

    tracing::info!(
        "search {:?} -> {} results ({:.2}ms)",
        filters.query,
        outcome.total,
        outcome.latency_ms
    );

    Ok(Json(outcome))
}

async fn recommendations_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<RecommendationSet> {
    Json(state.engine.recommendations(&user_id).await)
}

async fn hybrid_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<LimitParams>,
) -> Json<HybridSet> {
    Json(state.engine.hybrid_recommendations(&user_id, params.limit).await)
}

async fn trending_handler(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Json<RecommendationSet> {
    Json(state.engine.trending(params.limit).await)
}

async fn related_handler(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Json<Vec<Book>> {
    Json(state.engine.related(&book_id).await)
}

async fn suggest_handler(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Json<Vec<Suggestion>> {
    Json(state.engine.suggest(&params.q).await)
}

async fn mood_handler(
    State(state): State<AppState>,
    Query(params): Query<MoodParams>,
) -> Result<Json<Vec<Book>>, AppError> {
    let mood = Mood::parse(&params.mood).ok_or_else(|| {
        AppError(tomesphere_discovery_engine::DiscoveryError::NotFound(format!(
            "unknown mood: {}",
            params.mood
        )))
    })?;

    Ok(Json(state.engine.books_for_mood(mood).await))
}

// Error handling
struct AppError(tomesphere_discovery_engine::DiscoveryError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        use tomesphere_discovery_engine::DiscoveryError;

        let (status, message) = match self.0 {
            DiscoveryError::NotFound(what) => (StatusCode::NOT_FOUND, what),
            DiscoveryError::NoResults(query) => {
                (StatusCode::NOT_FOUND, format!("No results for: {query}"))
            }
            DiscoveryError::Service { service, message } => (
                StatusCode::BAD_GATEWAY,
                format!("Data service '{service}' error: {message}"),
            ),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        tracing::error!("Error: {} - {}", status, message);

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<tomesphere_discovery_engine::DiscoveryError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
