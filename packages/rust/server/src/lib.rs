//! HTTP surface for SiteTriage.
//!
//! Exposes `POST /triage/scan` and `GET /health` over axum, backed by a
//! shared [`Scanner`](sitetriage_core::Scanner).

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::{AppState, ScanResponse, create_routes};
pub use server::{TriageServer, shutdown_signal};
