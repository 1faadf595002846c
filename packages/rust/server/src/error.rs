use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sitetriage_shared::{InputError, TriageError};
use tracing::error;

/// Error returned from route handlers.
///
/// Input problems become `400` with the validation message verbatim.
/// Everything else is logged and reported as `500`.
#[derive(Debug)]
pub struct ApiError(pub TriageError);

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        Self(err)
    }
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %self.0, "scan failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(json!({
            "success": false,
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}
