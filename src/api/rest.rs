// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and are public (read-only analysis).
//
//   GET /api/v1/health            liveness + server time
//   GET /api/v1/analyze           analysis for the configured default ticker
//   GET /api/v1/analyze/:ticker   analysis for `ticker`
//
// Errors are returned as `{ "error": "...", "kind": "..." }`.
//
// CORS is configured permissively so a browser dashboard can call the API
// from any origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::error::SignalError;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/analyze", get(analyze_default))
        .route("/api/v1/analyze/:ticker", get(analyze_ticker))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for SignalError {
    fn into_response(self) -> Response {
        let status = match &self {
            SignalError::InvalidTicker => StatusCode::BAD_REQUEST,
            SignalError::EmptySeries | SignalError::InsufficientHistory { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            SignalError::UpstreamFetch { .. } => StatusCode::BAD_GATEWAY,
            SignalError::UnorderedSeries { .. } | SignalError::IncompleteInput { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
    started_at: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
        started_at: state.started_at,
    })
}

// =============================================================================
// Analysis
// =============================================================================

async fn analyze_default(State(state): State<Arc<AppState>>) -> Response {
    let ticker = state.config.default_ticker.clone();
    run_analysis(&state, &ticker).await
}

async fn analyze_ticker(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Response {
    run_analysis(&state, &ticker).await
}

async fn run_analysis(state: &AppState, ticker: &str) -> Response {
    match state.analyzer.analyze(ticker).await {
        Ok(report) => {
            info!(ticker = %report.ticker, signal = %report.signal.classification, "analysis served");
            Json(report).into_response()
        }
        Err(e) => {
            warn!(ticker, error = %e, "analysis failed");
            e.into_response()
        }
    }
}
