pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod services;

use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use services::{
    backend::build_http_client, BackendClient, ChatService, KitespotService, LocationService,
    NewsService, TimezoneService, WeatherService,
};

// Shared state для всего приложения
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: config::Config,
    pub backend: BackendClient,
    pub kitespots: KitespotService,
    pub chat: ChatService,
    pub news: NewsService,
    pub timezone: TimezoneService,
    pub weather: WeatherService,
    pub locations: LocationService,
}

impl AppState {
    pub fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let http_client = build_http_client(Duration::from_secs(config.backend.timeout_seconds))?;
        let backend = BackendClient::new(config.backend.api_url.clone(), http_client.clone());

        let state = Arc::new(Self {
            kitespots: KitespotService::new(backend.clone()),
            chat: ChatService::new(backend.clone()),
            news: NewsService::new(http_client.clone(), config.news.feed_url.clone()),
            timezone: TimezoneService::new(
                http_client.clone(),
                config.timezone.google_api_key.clone(),
                config.timezone.google_url.clone(),
            ),
            weather: WeatherService::new(http_client.clone(), config.weather.clone()),
            locations: LocationService::new(http_client, &config.locations),
            backend,
            config,
        });

        Ok(state)
    }
}

/// Полный роутер приложения.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Kitespot gateway v0.1" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .merge(controllers::page_routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
