//! weather.rs
//!
//! Погода по координатам из Tomorrow.io.
//!
//! Сбои Tomorrow.io повторяются с экспоненциальной задержкой
//! (`failsafe::backoff`). На 429 повторов нет: запрос сразу уходит в
//! Weatherbit, а его ответ перекладывается в формат Tomorrow.io с
//! пометкой `_meta.source = "weatherbit"`.

use chrono::{DateTime, SecondsFormat, Utc};
use failsafe::backoff;
use reqwest::{header::ACCEPT, StatusCode};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::{
    config::WeatherConfig,
    error::{BackendError, BackendResult},
    services::backend::send_json,
};

/// Часов прогноза, запрашиваемых у Weatherbit.
const WEATHERBIT_FORECAST_HOURS: &str = "120";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherKind {
    Realtime,
    Forecast,
}

impl WeatherKind {
    fn tomorrow_path(self) -> &'static str {
        match self {
            WeatherKind::Realtime => "/weather/realtime",
            WeatherKind::Forecast => "/weather/forecast",
        }
    }
}

#[derive(Clone, Debug)]
pub struct WeatherService {
    http_client: reqwest::Client,
    config: WeatherConfig,
}

impl WeatherService {
    pub fn new(http_client: reqwest::Client, config: WeatherConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub async fn realtime(&self, lat: &str, lon: &str) -> BackendResult<Value> {
        self.fetch(WeatherKind::Realtime, lat, lon).await
    }

    pub async fn forecast(&self, lat: &str, lon: &str) -> BackendResult<Value> {
        self.fetch(WeatherKind::Forecast, lat, lon).await
    }

    #[instrument(skip(self))]
    async fn fetch(&self, kind: WeatherKind, lat: &str, lon: &str) -> BackendResult<Value> {
        let api_key = self
            .config
            .tomorrow_api_key
            .as_deref()
            .ok_or(BackendError::NotConfigured("TOMORROW_IO_API_KEY"))?;

        let url = format!("{}{}", self.config.tomorrow_url, kind.tomorrow_path());
        let location = format!("{lat},{lon}");
        let start = Duration::from_millis(self.config.retry_delay_ms);
        let mut delays = backoff::exponential(start, start * 2_u32.pow(self.config.max_retries));

        let mut attempt = 0;
        loop {
            let request = self
                .http_client
                .get(&url)
                .header(ACCEPT, "application/json")
                .query(&[("location", location.as_str()), ("apikey", api_key)]);

            match send_json(request).await {
                Ok(data) => return Ok(data),
                Err(BackendError::Status { status })
                    if status == StatusCode::TOO_MANY_REQUESTS.as_u16() =>
                {
                    info!("Tomorrow.io rate limited (429), falling back to Weatherbit");
                    return self.fetch_weatherbit(kind, lat, lon).await;
                }
                Err(e) if attempt < self.config.max_retries => {
                    let delay = delays.next().unwrap_or(start);
                    attempt += 1;
                    warn!(
                        "Tomorrow.io error: {}, retrying in {:?} (attempt {}/{})",
                        e,
                        delay,
                        attempt + 1,
                        self.config.max_retries + 1
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_weatherbit(&self, kind: WeatherKind, lat: &str, lon: &str) -> BackendResult<Value> {
        let api_key = self
            .config
            .weatherbit_api_key
            .as_deref()
            .ok_or(BackendError::NotConfigured("WEATHERBIT_API_KEY"))?;

        let request = match kind {
            WeatherKind::Realtime => self
                .http_client
                .get(format!("{}/current", self.config.weatherbit_url))
                .query(&[("lat", lat), ("lon", lon), ("key", api_key)]),
            WeatherKind::Forecast => self
                .http_client
                .get(format!("{}/forecast/hourly", self.config.weatherbit_url))
                .query(&[
                    ("lat", lat),
                    ("lon", lon),
                    ("hours", WEATHERBIT_FORECAST_HOURS),
                    ("key", api_key),
                ]),
        };

        let data = send_json(request.header(ACCEPT, "application/json")).await?;
        match kind {
            WeatherKind::Realtime => realtime_from_weatherbit(&data, Utc::now()),
            WeatherKind::Forecast => forecast_from_weatherbit(&data),
        }
    }
}

// (поле Tomorrow.io, поле Weatherbit)
const CURRENT_FIELDS: [(&str, &str); 9] = [
    ("temperature", "temp"),
    ("windSpeed", "wind_spd"),
    ("windDirection", "wind_dir"),
    ("precipitationIntensity", "precip"),
    ("humidity", "rh"),
    ("pressureSurfaceLevel", "pres"),
    ("visibility", "vis"),
    ("cloudCover", "clouds"),
    ("uvIndex", "uv"),
];

const HOURLY_FIELDS: [(&str, &str); 6] = [
    ("temperature", "temp"),
    ("windSpeed", "wind_spd"),
    ("windDirection", "wind_dir"),
    ("precipitationIntensity", "precip"),
    ("humidity", "rh"),
    ("cloudCover", "clouds"),
];

/// Переименовывает поля; отсутствующие в источнике пропускаются.
fn pick_values(source: &Value, fields: &[(&str, &str)]) -> Value {
    let values: Map<String, Value> = fields
        .iter()
        .filter_map(|(to, from)| source.get(*from).map(|value| (to.to_string(), value.clone())))
        .collect();
    Value::Object(values)
}

fn invalid_weatherbit() -> BackendError {
    BackendError::Decode("invalid Weatherbit data format".to_string())
}

/// `/current` Weatherbit -> `{data: {time, values}}` Tomorrow.io.
pub fn realtime_from_weatherbit(data: &Value, now: DateTime<Utc>) -> BackendResult<Value> {
    let current = data
        .get("data")
        .and_then(|items| items.get(0))
        .ok_or_else(invalid_weatherbit)?;

    Ok(json!({
        "data": {
            "time": now.to_rfc3339_opts(SecondsFormat::Millis, true),
            "values": pick_values(current, &CURRENT_FIELDS),
        },
        "_meta": { "source": "weatherbit" },
    }))
}

/// `/forecast/hourly` Weatherbit -> `{timelines: {hourly: [...]}}` Tomorrow.io.
pub fn forecast_from_weatherbit(data: &Value) -> BackendResult<Value> {
    let items = data
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(invalid_weatherbit)?;

    let hourly: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "time": item.get("timestamp_local").cloned().unwrap_or(Value::Null),
                "values": pick_values(item, &HOURLY_FIELDS),
            })
        })
        .collect();

    Ok(json!({
        "timelines": { "hourly": hourly },
        "_meta": { "source": "weatherbit" },
    }))
}
