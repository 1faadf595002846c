use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};
use sitetriage_core::{ScanRequest, Scanner};
use sitetriage_crawler::SilentObserver;
use sitetriage_shared::InputError;
use sitetriage_triage::TriageReport;
use tracing::debug;

use crate::error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
}

impl AppState {
    pub fn new(scanner: Scanner) -> Self {
        Self {
            scanner: Arc::new(scanner),
        }
    }
}

/// Body of a successful `POST /triage/scan`.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: TriageReport,
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/triage/scan", post(scan))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "sitetriage",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn scan(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<ScanResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(%rejection, "rejected scan body");
        InputError::MalformedBody
    })?;

    let report = state.scanner.scan(&request, &SilentObserver).await?;

    Ok(Json(ScanResponse {
        success: true,
        report,
    }))
}
