use crate::api::ItemsResponse;
use crate::error::{ApiError, Route};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

/// GET /random-items-cached/{feed_id}
pub async fn get_items_cached(
    State(state): State<AppState>,
    Path(feed_id): Path<String>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let result = state
        .reader
        .fetch(&feed_id)
        .await
        .map_err(|e| ApiError::new(Route::Cached, e))?;

    info!(
        "GET cached: feed={}, rows={}, source={}, time={}ms",
        feed_id,
        result.records.len(),
        result.source.as_str(),
        result.elapsed_ms()
    );

    Ok(Json(result.into()))
}

/// GET /random-items/{feed_id}
pub async fn get_items_uncached(
    State(state): State<AppState>,
    Path(feed_id): Path<String>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let result = state
        .reader
        .fetch_uncached(&feed_id)
        .await
        .map_err(|e| ApiError::new(Route::Uncached, e))?;

    info!(
        "GET uncached: feed={}, rows={}, time={}ms",
        feed_id,
        result.records.len(),
        result.elapsed_ms()
    );

    Ok(Json(result.into()))
}
