use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/backend-proxy", get(backend_proxy))
}

/// GET /api/backend-proxy
///
/// Проверка доступности бэкенда. Статус и тело бэкенда при ошибке наружу не отдаются.
pub async fn backend_proxy(State(state): State<Arc<AppState>>) -> Response {
    match state.backend.health().await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!("Error connecting to backend: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": "Failed to connect to backend service"
                })),
            )
                .into_response()
        }
    }
}
