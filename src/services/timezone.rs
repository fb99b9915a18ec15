use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{BackendError, BackendResult},
    models::TimeZoneInfo,
    services::backend::send_json,
};

/// Ответ Google Time Zone API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleTimeZone {
    status: String,
    #[serde(default)]
    time_zone_id: String,
    #[serde(default)]
    time_zone_name: String,
    #[serde(default)]
    raw_offset: i64,
    #[serde(default)]
    dst_offset: i64,
}

/// Определение часового пояса по координатам.
///
/// С ключом Google идёт в Time Zone API, без ключа - оценка по долготе.
#[derive(Clone, Debug)]
pub struct TimezoneService {
    http_client: reqwest::Client,
    google_api_key: Option<String>,
    google_url: String,
}

impl TimezoneService {
    pub fn new(
        http_client: reqwest::Client,
        google_api_key: Option<String>,
        google_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            google_api_key,
            google_url: google_url.into(),
        }
    }

    pub async fn resolve(&self, lat: f64, lng: f64, timestamp: i64) -> BackendResult<TimeZoneInfo> {
        let Some(api_key) = &self.google_api_key else {
            debug!("No Google Maps API key, approximating time zone from longitude");
            return Ok(approximate_time_zone(lng));
        };

        let location = format!("{lat},{lng}");
        let timestamp = timestamp.to_string();
        let request = self.http_client.get(&self.google_url).query(&[
            ("location", location.as_str()),
            ("timestamp", timestamp.as_str()),
            ("key", api_key.as_str()),
        ]);

        let data: GoogleTimeZone = serde_json::from_value(send_json(request).await?)
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        if data.status != "OK" {
            return Err(BackendError::Rejected(format!(
                "Google Time Zone API error: {}",
                data.status
            )));
        }

        Ok(TimeZoneInfo {
            time_zone_id: data.time_zone_id,
            time_zone_name: data.time_zone_name,
            raw_offset: data.raw_offset,
            dst_offset: data.dst_offset,
            approximated: None,
        })
    }
}

/// Пояс по долготе: 15 градусов на час, без летнего времени.
///
/// Знак в `Etc/GMT` обратный: восточнее Гринвича - `Etc/GMT-N`.
pub fn approximate_time_zone(lng: f64) -> TimeZoneInfo {
    // округление половин вверх, как Math.round
    let hour_offset = (lng / 15.0 + 0.5).floor() as i64;

    let time_zone_id = match hour_offset {
        0 => "Etc/GMT".to_string(),
        h if h > 0 => format!("Etc/GMT-{h}"),
        h => format!("Etc/GMT+{}", h.abs()),
    };
    let time_zone_name = if hour_offset >= 0 {
        format!("GMT+{hour_offset}")
    } else {
        format!("GMT{hour_offset}")
    };

    TimeZoneInfo {
        time_zone_id,
        time_zone_name,
        raw_offset: hour_offset * 3600,
        dst_offset: 0,
        approximated: Some(true),
    }
}
