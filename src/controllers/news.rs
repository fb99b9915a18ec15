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
    Router::new().route("/kitesurfing-news", get(kitesurfing_news))
}

/// GET /api/kitesurfing-news
pub async fn kitesurfing_news(State(state): State<Arc<AppState>>) -> Response {
    match state.news.fetch_news().await {
        Ok(news) => Json(news).into_response(),
        Err(e) => {
            error!("Error fetching kitesurfing news: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "totalResults": 0,
                    "articles": [],
                    "error": "Failed to fetch kitesurfing news"
                })),
            )
                .into_response()
        }
    }
}
