use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use super::error_response;
use crate::{services::weather::WeatherKind, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/weather/realtime", get(realtime))
        .route("/weather/forecast", get(forecast))
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// GET /api/weather/realtime?lat=..&lon=..
pub async fn realtime(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeatherQuery>,
) -> Response {
    weather_response(&state, WeatherKind::Realtime, params).await
}

/// GET /api/weather/forecast?lat=..&lon=..
pub async fn forecast(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeatherQuery>,
) -> Response {
    weather_response(&state, WeatherKind::Forecast, params).await
}

async fn weather_response(state: &AppState, kind: WeatherKind, params: WeatherQuery) -> Response {
    let (Some(lat), Some(lon)) = (
        params.lat.filter(|v| !v.is_empty()),
        params.lon.filter(|v| !v.is_empty()),
    ) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Both 'lat' and 'lon' parameters are required",
        );
    };

    let (result, message) = match kind {
        WeatherKind::Realtime => (
            state.weather.realtime(&lat, &lon).await,
            "Failed to fetch realtime weather data",
        ),
        WeatherKind::Forecast => (
            state.weather.forecast(&lat, &lon).await,
            "Failed to fetch forecast weather data",
        ),
    };

    match result {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!("Error fetching {:?} weather: {}", kind, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}
