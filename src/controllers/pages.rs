//! Страницы спотов.
//!
//! `/kitespots/{segment}` - старый адрес, принимает и имя, и id.
//! `/kitespot/{id}` - каноничный адрес страницы по id.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::{debug, error};

use super::error_response;
use crate::{
    error::BackendResult,
    models::{KiteSpot, SpotIdentifier},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/kitespots/{segment}", get(legacy_kitespot))
        .route("/kitespot/{id}", get(kitespot_by_id))
}

/// GET /kitespots/{segment}
pub async fn legacy_kitespot(
    State(state): State<Arc<AppState>>,
    Path(segment): Path<String>,
) -> Response {
    let identifier = SpotIdentifier::classify(&segment);
    if let Some(path) = identifier.redirect_path() {
        debug!("Redirecting legacy kitespot id {} to {}", identifier.as_str(), path);
        return Redirect::temporary(&path).into_response();
    }

    let name = identifier.as_str();
    spot_response(state.kitespots.get_kitespot_by_name(name).await, name)
}

/// GET /kitespot/{id}
pub async fn kitespot_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    spot_response(state.kitespots.get_kitespot_by_id(&id).await, &id)
}

fn spot_response(result: BackendResult<Option<KiteSpot>>, key: &str) -> Response {
    match result {
        Ok(Some(spot)) => Json(spot).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Kitespot not found"),
        Err(e) => {
            error!("Error fetching kitespot {}: {}", key, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch kitespot")
        }
    }
}
