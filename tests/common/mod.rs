#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use config::Map;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

use kitespot_gateway::{build_router, config::Config, AppState};

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(axum::http::header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

pub fn config_with(pairs: &[(&str, &str)]) -> Config {
    let vars: Map<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_vars(vars).expect("test config")
}

/// Роутер, у которого бэкенд и RSS-лента смотрят в mock-сервер.
pub fn app_for(server: &MockServer) -> Router {
    let feed_url = format!("{}/feed/", server.uri());
    let config = config_with(&[
        ("NEXT_PUBLIC_API_URL", server.uri().as_str()),
        ("NEWS_FEED_URL", feed_url.as_str()),
        ("BACKEND_TIMEOUT_SECONDS", "5"),
    ]);
    app_with_config(config)
}

pub fn app_with_config(config: Config) -> Router {
    build_router(AppState::new(config).expect("app state"))
}

/// Роутер с бэкендом на заведомо закрытом порту.
pub fn app_with_dead_backend() -> Router {
    app_with_config(config_with(&[
        ("NEXT_PUBLIC_API_URL", "http://127.0.0.1:9"),
        ("BACKEND_TIMEOUT_SECONDS", "2"),
    ]))
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .oneshot(builder.body(body).unwrap())
        .await
        .expect("router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None).await
}
