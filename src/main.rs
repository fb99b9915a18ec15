use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kitespot_gateway::{build_router, config::Config, AppState};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log));
    if config.app.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Starting kitespot gateway ({})", config.app.environment);
    info!("Backend API: {}", config.backend.api_url);
    if config.timezone.google_api_key.is_none() {
        info!("GOOGLE_MAPS_API_KEY not set, time zones will be approximated");
    }
    if config.weather.tomorrow_api_key.is_none() {
        warn!("TOMORROW_IO_API_KEY not set, weather routes will fail");
    }
    if config.locations.locationiq_api_key.is_none() {
        info!("LOCATIONIQ_API_KEY not set, autocomplete serves known locations only");
    }

    // Создаём общее состояние приложения
    let app_state = AppState::new(config.clone())?;
    let app = build_router(app_state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
