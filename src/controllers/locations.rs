use axum::{
    extract::{Query, State},
    http::{header::CACHE_CONTROL, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use super::error_response;
use crate::{
    services::{locations::mock_locations, locations::RATE_LIMIT_WINDOW, Suggestions},
    AppState,
};

const DEFAULT_LIMIT: usize = 5;
const PUBLIC_HOUR: &str = "public, max-age=3600";

const X_CACHE: HeaderName = HeaderName::from_static("x-cache");
const X_SOURCE: HeaderName = HeaderName::from_static("x-source");
const X_RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("x-rate-limit-limit");
const X_RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("x-rate-limit-remaining");
const X_RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("x-rate-limit-reset");

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/autocomplete", get(autocomplete))
        .route("/mock-locations", get(mock))
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub dedupe: Option<String>,
}

impl LocationQuery {
    // Нечисловой limit - значение по умолчанию
    fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|limit| limit.trim().parse().ok())
            .unwrap_or(DEFAULT_LIMIT)
    }
}

/// GET /api/autocomplete?q=..[&limit=..][&dedupe=..]
pub async fn autocomplete(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationQuery>,
) -> Response {
    let limit = params.limit();
    let dedupe = params.dedupe.clone().unwrap_or_else(|| "1".to_string());
    let Some(query) = params.q.filter(|q| !q.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Query parameter 'q' is required");
    };

    match state.locations.autocomplete(&query, limit, &dedupe).await {
        Ok(Suggestions::Cached(data)) => (
            [
                (CACHE_CONTROL, PUBLIC_HOUR.to_string()),
                (X_CACHE, "HIT".to_string()),
            ],
            Json(data),
        )
            .into_response(),
        Ok(Suggestions::Fresh(data)) => (
            [
                (CACHE_CONTROL, PUBLIC_HOUR.to_string()),
                (X_SOURCE, "locationiq".to_string()),
            ],
            Json(data),
        )
            .into_response(),
        Ok(Suggestions::RateLimited(locations)) => {
            let reset = Utc::now().timestamp() + RATE_LIMIT_WINDOW.as_secs() as i64;
            (
                [
                    (X_RATE_LIMIT_LIMIT, state.locations.rate_limit().to_string()),
                    (X_RATE_LIMIT_REMAINING, "0".to_string()),
                    (X_RATE_LIMIT_RESET, reset.to_string()),
                    (X_SOURCE, "fallback".to_string()),
                ],
                Json(locations),
            )
                .into_response()
        }
        Ok(Suggestions::Fallback(locations)) => (
            [
                (CACHE_CONTROL, PUBLIC_HOUR.to_string()),
                (X_SOURCE, "fallback".to_string()),
            ],
            Json(locations),
        )
            .into_response(),
        Err(e) => {
            error!("Location autocomplete failed without fallback: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to fetch location suggestions",
                    "details": e.to_string(),
                    "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/mock-locations?q=..[&limit=..]
pub async fn mock(Query(params): Query<LocationQuery>) -> Response {
    let limit = params.limit();
    let Some(query) = params.q.filter(|q| !q.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Query parameter 'q' is required");
    };

    Json(mock_locations(&query, limit)).into_response()
}
