use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::{error::BackendResult, services::backend::BackendClient};

pub const FALLBACK_REPLY: &str = "Sorry, I couldn't generate a response.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Чат-ассистент на стороне бэкенда.
#[derive(Clone, Debug)]
pub struct ChatService {
    backend: BackendClient,
}

impl ChatService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// POST /api/chat `{message}` -> `reply`.
    ///
    /// Ошибки не глотаются: они логируются и возвращаются вызывающему.
    pub async fn get_chat_response(&self, message: &str) -> BackendResult<String> {
        match self
            .backend
            .post_json("/api/chat", &ChatRequest { message })
            .await
        {
            Ok(data) => Ok(extract_reply(&data)),
            Err(e) => {
                error!("Error fetching chat response: {}", e);
                Err(e)
            }
        }
    }
}

/// Непустая строка `reply` или запасной ответ.
pub fn extract_reply(data: &Value) -> String {
    data.get("reply")
        .and_then(Value::as_str)
        .filter(|reply| !reply.is_empty())
        .unwrap_or(FALLBACK_REPLY)
        .to_string()
}
