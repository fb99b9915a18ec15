pub mod chat;
pub mod health;
pub mod kitespots;
pub mod locations;
pub mod news;
pub mod pages;
pub mod timezone;
pub mod weather;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::AppState;

/// Маршруты под `/api`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::routes())
        .merge(kitespots::routes())
        .merge(chat::routes())
        .merge(news::routes())
        .merge(timezone::routes())
        .merge(weather::routes())
        .merge(locations::routes())
}

/// Страницы спотов и редиректы со старых адресов.
pub fn page_routes() -> Router<Arc<AppState>> {
    pages::routes().merge(kitespots::autocomplete_routes())
}

// Единый формат ошибки: {"error": "..."}
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
