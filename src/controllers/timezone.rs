use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use super::error_response;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/timezone", get(get_timezone))
}

#[derive(Debug, Deserialize)]
pub struct TimezoneQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub timestamp: Option<i64>,
}

/// GET /api/timezone?lat=..&lng=..[&timestamp=..]
pub async fn get_timezone(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TimezoneQuery>,
) -> Response {
    let (Some(lat), Some(lng)) = (
        params.lat.filter(|v| !v.is_empty()),
        params.lng.filter(|v| !v.is_empty()),
    ) else {
        return error_response(StatusCode::BAD_REQUEST, "Latitude and longitude are required");
    };

    let (Ok(lat), Ok(lng)) = (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) else {
        return error_response(StatusCode::BAD_REQUEST, "Latitude and longitude must be numeric");
    };
    if !lat.is_finite() || !lng.is_finite() {
        return error_response(StatusCode::BAD_REQUEST, "Latitude and longitude must be numeric");
    }

    let timestamp = params.timestamp.unwrap_or_else(|| Utc::now().timestamp());

    match state.timezone.resolve(lat, lng, timestamp).await {
        Ok(info) => Json(info).into_response(),
        Err(e) => {
            error!("Error determining time zone: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to determine time zone")
        }
    }
}
