use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;

pub const CHAT_ERROR_REPLY: &str =
    "Sorry, I encountered an error processing your request. Please try again later.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat
pub async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> Response {
    // сервис сам логирует ошибку
    match state.chat.get_chat_response(&req.message).await {
        Ok(reply) => Json(ChatResponse { reply }).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ChatResponse {
                reply: CHAT_ERROR_REPLY.to_string(),
            }),
        )
            .into_response(),
    }
}
