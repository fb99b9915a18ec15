//! backend.rs
//!
//! Клиент внешнего FastAPI-бэкенда.
//!
//! Базовый URL и HTTP-клиент передаются явно, переменные окружения здесь не
//! читаются. Все запросы проходят через [`send_json`], который превращает
//! ответ в `serde_json::Value` либо в типизированную [`BackendError`].

use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{BackendError, BackendResult};

pub const NO_QUERY: &[(&str, &str)] = &[];

/// Отправляет запрос и читает JSON-ответ.
///
/// Статус вне 2xx -> [`BackendError::Status`], сетевой сбой ->
/// [`BackendError::Transport`], нечитаемое тело -> [`BackendError::Decode`].
pub async fn send_json(request: RequestBuilder) -> BackendResult<Value> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
        });
    }
    Ok(response.json::<Value>().await?)
}

/// Как [`send_json`], но 404 и JSON `null` означают «нет данных».
pub async fn send_optional_json(request: RequestBuilder) -> BackendResult<Option<Value>> {
    match send_json(request).await {
        Ok(Value::Null) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(BackendError::Status { status }) if status == StatusCode::NOT_FOUND.as_u16() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Общий HTTP-клиент с таймаутом на запрос.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("kitespot-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    /// Базовый URL бэкенда без завершающего `/`.
    base_url: String,
    http_client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<Q>(&self, path: &str, query: &Q) -> BackendResult<Value>
    where
        Q: Serialize + ?Sized,
    {
        debug!("GET {}{}", self.base_url, path);
        send_json(self.http_client.get(self.url(path)).query(query)).await
    }

    pub async fn get_optional_json(&self, path: &str) -> BackendResult<Option<Value>> {
        debug!("GET {}{}", self.base_url, path);
        send_optional_json(self.http_client.get(self.url(path))).await
    }

    pub async fn post_json<B>(&self, path: &str, body: &B) -> BackendResult<Value>
    where
        B: Serialize + ?Sized,
    {
        debug!("POST {}{}", self.base_url, path);
        send_json(self.http_client.post(self.url(path)).json(body)).await
    }

    /// GET /api/health
    pub async fn health(&self) -> BackendResult<Value> {
        self.get_json("/api/health", NO_QUERY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let client = BackendClient::new("http://backend:8000/", reqwest::Client::new());
        assert_eq!(client.base_url(), "http://backend:8000");
        assert_eq!(client.url("/api/health"), "http://backend:8000/api/health");
    }
}
