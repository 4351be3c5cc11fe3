//! # Learnhub HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET  /health` - Health check with row counts
//! - `GET  /api/concepts` - All concepts
//! - `GET  /api/concepts/category/{category}` - Concepts in a category
//! - `GET  /api/concepts/{slug}` - Concept with theory, code and experiments
//! - `POST /api/concepts` - Create a concept
//! - `GET  /api/theory/{conceptId}` - Theory of a concept
//! - `POST /api/theory` - Create theory content
//! - `GET  /api/code/{conceptId}` - Code implementations of a concept
//! - `POST /api/code` - Create a code implementation
//! - `GET  /api/experiments/{conceptId}` - Experiments of a concept
//! - `POST /api/experiments` - Create an experiment
//! - `GET  /api/papers` - All papers
//! - `GET  /api/papers/related?concepts=a,b` - Papers sharing a tag
//! - `GET  /api/papers/{id}` - One paper
//! - `POST /api/papers` - Create a paper

mod error;
mod handlers;
mod types;

pub use error::ApiError;
pub use handlers::{
    code_for_concept, concept_detail, concepts_by_category, create_code, create_concept,
    create_experiment, create_paper, create_theory, experiments_for_concept, health_handler,
    list_concepts, list_papers, paper_by_id, related_papers, theory_for_concept,
};
pub use types::{ErrorResponse, HealthResponse, RelatedPapersQuery};

use crate::config::ServerConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use learnhub_core::{ContentStore, HubError, MemStore};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// The store as shared by every handler.
pub type SharedStore = Arc<RwLock<Box<dyn ContentStore + Send + Sync>>>;

/// Shared server state containing the injected store.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    /// Wrap any store backend.
    pub fn new(store: impl ContentStore + Send + Sync + 'static) -> Self {
        Self {
            store: Arc::new(RwLock::new(Box::new(store))),
        }
    }

    /// State over a fresh store holding the seed dataset.
    pub fn seeded() -> Result<Self, HubError> {
        Ok(Self::new(MemStore::seeded()?))
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `["*"]`: any origin
/// - empty: localhost only
/// - otherwise: the listed origins; unparsable entries are skipped
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: allowing ALL origins; do not use this in production");
        return CorsLayer::permissive();
    }

    if origins.is_empty() {
        tracing::info!("CORS: no origins configured, allowing localhost only");
        return build_localhost_cors();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => {
                tracing::info!("CORS: allowing origin {}", origin);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("CORS: invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        tracing::warn!("CORS: no valid origins configured, allowing localhost only");
        return build_localhost_cors();
    }

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// CORS layer for the usual local dev-server origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5000",
        "http://localhost:5173",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5000",
        "http://127.0.0.1:5173",
    ]
    .iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner): tracing, CORS, body limit.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route(
            "/concepts",
            get(handlers::list_concepts).post(handlers::create_concept),
        )
        .route(
            "/concepts/category/{category}",
            get(handlers::concepts_by_category),
        )
        .route("/concepts/{slug}", get(handlers::concept_detail))
        .route("/theory", post(handlers::create_theory))
        .route("/theory/{concept_id}", get(handlers::theory_for_concept))
        .route("/code", post(handlers::create_code))
        .route("/code/{concept_id}", get(handlers::code_for_concept))
        .route("/experiments", post(handlers::create_experiment))
        .route(
            "/experiments/{concept_id}",
            get(handlers::experiments_for_concept),
        )
        .route(
            "/papers",
            get(handlers::list_papers).post(handlers::create_paper),
        )
        .route("/papers/related", get(handlers::related_papers))
        .route("/papers/{id}", get(handlers::paper_by_id));

    Router::new()
        .route("/health", get(handlers::health_handler))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(build_cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Bind `config.addr()` and serve until the process is stopped.
pub async fn run_server(config: &ServerConfig, state: AppState) -> Result<(), HubError> {
    let router = create_router(state, config);
    let addr = config.addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HubError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Learnhub HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| HubError::Io(format!("Server error: {}", e)))
}
