use crate::error::{ApiError, Result};
use crate::model::{ShortenParams, ShortenResponse};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use tracing::info;

pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ShortenParams>,
) -> Result<Json<ShortenResponse>> {
    let user = headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .and_then(|key| state.api_keys().authorize(key))
        .ok_or(ApiError::Unauthorized)?;

    let url = params.url.ok_or(ApiError::MissingUrl)?;
    info!(user, url = %url, "received shorten request");

    let mapping = state.resolver().resolve_or_create(&url).await?;

    Ok(Json(ShortenResponse {
        short_url: mapping.short_url,
    }))
}
