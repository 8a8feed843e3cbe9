use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use keyhole_core::ResolveError;
use serde_json::json;
use tracing::error;

pub type Result<T> = std::result::Result<T, ApiError>;

pub enum ApiError {
    /// The request carried no `X-API-Key` header, or an unknown key.
    Unauthorized,
    /// The `url` query parameter is missing.
    MissingUrl,
    /// The resolution pipeline failed; only storage faults reach here.
    Resolve(ResolveError),
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            ApiError::MissingUrl => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "missing 'url' query parameter" })),
            )
                .into_response(),
            ApiError::Resolve(e) => {
                error!(error = %e, "An internal server error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
