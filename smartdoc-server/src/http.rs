//! SmartDoc HTTP API
//!
//! Axum server exposing doctor search and recommendations to the web
//! frontend and `smartdoc-cli`. Every endpoint has a thin axum handler that
//! delegates to an inner function returning `(StatusCode, Value)`, so the
//! logic is testable without going through the router.
//!
//! Endpoints:
//! - GET  /            : frontend (`{static_dir}/index.html`)
//! - GET  /static/*    : frontend assets
//! - GET  /health      : store reachability and LLM availability
//! - POST /recommend   : search + explanation
//! - POST /search      : vector search only
//! - GET  /locations   : filterable locations
//! - GET  /specialties : filterable specialties
//! - GET  /examples    : canned patient queries

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use smartdoc_core::catalog;
use smartdoc_core::config::{HttpConfig, RetrievalConfig};
use smartdoc_core::SearchFilter;

use crate::rag::RagService;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub rag: RagService,
    pub retrieval: RetrievalConfig,
}

/// Build the Axum router with all endpoints and the static frontend.
pub fn build_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();
    Router::new()
        .route("/health", get(health_handler))
        .route("/recommend", post(recommend_handler))
        .route("/search", post(search_handler))
        .route("/locations", get(locations_handler))
        .route("/specialties", get(specialties_handler))
        .route("/examples", get(examples_handler))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until the broadcast shutdown signal fires.
pub async fn start_http_server(
    state: Arc<AppState>,
    config: HttpConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = build_router(state, &config.static_dir);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("SmartDoc HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Body of `POST /recommend` and `POST /search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientQuery {
    pub query: Option<String>,
    pub location: Option<String>,
    pub specialty: Option<String>,
    pub n_results: Option<i64>,
}

/// Hard ceiling on `n_results`; a larger configured maximum is clamped to it.
pub const MAX_N_RESULTS: i64 = 20;

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidQuery {
    pub query: String,
    pub filter: SearchFilter,
    pub n_results: usize,
}

pub fn validate(req: PatientQuery, retrieval: &RetrievalConfig) -> Result<ValidQuery, String> {
    let query = match req.query {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Err("query field is required".to_string()),
    };

    let max = i64::from(retrieval.max_n_results).clamp(1, MAX_N_RESULTS);
    let n_results = req
        .n_results
        .unwrap_or_else(|| i64::from(retrieval.default_n_results).clamp(1, max));
    if !(1..=max).contains(&n_results) {
        return Err(format!("n_results must be between 1 and {max}"));
    }

    Ok(ValidQuery {
        query,
        filter: SearchFilter::new(req.location, req.specialty),
        n_results: n_results as usize,
    })
}

fn error_body(status: StatusCode, error: impl Into<String>) -> (StatusCode, Value) {
    (status, json!({ "error": error.into(), "status": "error" }))
}

// ============================================================================
// Inner (directly testable) functions
// ============================================================================

pub async fn health_inner(rag: &RagService) -> (StatusCode, Value) {
    match rag.store().count().await {
        Ok(count) => (
            StatusCode::OK,
            json!({
                "status": "healthy",
                "llm_enabled": rag.llm_enabled(),
                "database_connected": true,
                "message": format!("SmartDoc API is running ({count} doctors indexed)"),
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({
                "status": "unhealthy",
                "llm_enabled": rag.llm_enabled(),
                "database_connected": false,
                "message": e.to_string(),
            }),
        ),
    }
}

pub async fn recommend_inner(
    rag: &RagService,
    retrieval: &RetrievalConfig,
    req: PatientQuery,
) -> (StatusCode, Value) {
    let valid = match validate(req, retrieval) {
        Ok(v) => v,
        Err(e) => return error_body(StatusCode::UNPROCESSABLE_ENTITY, e),
    };

    let response = rag
        .process_patient_query(
            &valid.query,
            valid.filter.location,
            valid.filter.specialty,
            valid.n_results,
        )
        .await;

    match response.map(serde_json::to_value) {
        Ok(Ok(body)) => (StatusCode::OK, body),
        Ok(Err(e)) => error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "Recommendation failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub async fn search_inner(
    rag: &RagService,
    retrieval: &RetrievalConfig,
    req: PatientQuery,
) -> (StatusCode, Value) {
    let valid = match validate(req, retrieval) {
        Ok(v) => v,
        Err(e) => return error_body(StatusCode::UNPROCESSABLE_ENTITY, e),
    };

    match rag
        .search_doctors(&valid.query, &valid.filter, valid.n_results)
        .await
    {
        Ok(results) => (
            StatusCode::OK,
            json!({
                "success": true,
                "total": results.len(),
                "results": results,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Search failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub fn locations_inner() -> Value {
    json!({ "locations": catalog::locations() })
}

pub fn specialties_inner() -> Value {
    json!({ "specialties": catalog::specialties() })
}

pub fn examples_inner() -> Value {
    json!({ "examples": catalog::EXAMPLE_QUERIES })
}

// ============================================================================
// Axum handler wrappers (thin, delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.rag).await;
    (status, Json(body))
}

pub async fn recommend_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PatientQuery>, JsonRejection>,
) -> impl IntoResponse {
    let (status, body) = match payload {
        Ok(Json(req)) => recommend_inner(&state.rag, &state.retrieval, req).await,
        Err(rejection) => error_body(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text()),
    };
    (status, Json(body))
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PatientQuery>, JsonRejection>,
) -> impl IntoResponse {
    let (status, body) = match payload {
        Ok(Json(req)) => search_inner(&state.rag, &state.retrieval, req).await,
        Err(rejection) => error_body(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text()),
    };
    (status, Json(body))
}

pub async fn locations_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(locations_inner()))
}

pub async fn specialties_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(specialties_inner()))
}

pub async fn examples_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(examples_inner()))
}

// ============================================================================
// Unit Tests
// ============================================================================
