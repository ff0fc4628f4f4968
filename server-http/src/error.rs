use crate::api::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use feedcache::FetchError;
use tracing::error;

/// Which items route produced the failure; only the wording differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Cached,
    Uncached,
}

#[derive(Debug)]
pub struct ApiError {
    route: Route,
    source: FetchError,
}

impl ApiError {
    pub fn new(route: Route, source: FetchError) -> Self {
        Self { route, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match (&self.source, self.route) {
            (FetchError::Input(_), _) => (StatusCode::BAD_REQUEST, "Invalid feedId parameter"),
            (FetchError::Store(e), Route::Cached) => {
                error!("Database query failed after cache miss: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database query failed after cache miss",
                )
            }
            (FetchError::Store(e), Route::Uncached) => {
                error!("Database query failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database query failed")
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
