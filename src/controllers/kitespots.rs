use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use super::error_response;
use crate::{services::KitespotFilters, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/kitespots", get(list_kitespots))
        .route("/kitespots/countries", get(list_countries))
        .route("/kitespots/{id}/forecast", get(get_forecast))
}

/// Подсказки живут вне `/api`, рядом со страницами спотов.
/// Статический путь имеет приоритет над `/kitespots/{segment}`.
pub fn autocomplete_routes() -> Router<Arc<AppState>> {
    Router::new().route("/kitespots/autocomplete", get(autocomplete))
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    pub query: Option<String>,
}

/// GET /kitespots/autocomplete?query=..
pub async fn autocomplete(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AutocompleteQuery>,
) -> Response {
    let Some(query) = params.query.filter(|q| !q.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Query parameter is required");
    };

    match state.kitespots.autocomplete(&query).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!("Error in kitespot autocomplete: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch autocomplete suggestions",
            )
        }
    }
}

/// GET /api/kitespots
pub async fn list_kitespots(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<KitespotFilters>,
) -> Response {
    match state.kitespots.list_raw(&filters).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!("Error fetching kitespots: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch kitespots")
        }
    }
}

/// GET /api/kitespots/countries
pub async fn list_countries(State(state): State<Arc<AppState>>) -> Response {
    match state.kitespots.get_all_countries().await {
        Ok(countries) => Json(countries).into_response(),
        Err(e) => {
            error!("Error fetching countries: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch countries")
        }
    }
}

/// GET /api/kitespots/{id}/forecast
///
/// Единственный маршрут, который отличает «не найдено» (404) от сбоя (500).
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.kitespots.get_kitespot_forecast(&id).await {
        Ok(Some(forecast)) => Json(forecast).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Forecast not found"),
        Err(e) => {
            error!("Error fetching forecast for spot {}: {}", id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch forecast")
        }
    }
}
