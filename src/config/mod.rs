use anyhow::{bail, Context, Result};
use config::{Environment, Map};
use serde::Deserialize;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub news: NewsConfig,
    pub timezone: TimezoneConfig,
    pub weather: WeatherConfig,
    pub locations: LocationConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    /// pretty или json
    pub log_format: String,
}

// Внешний бэкенд (FastAPI)
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub api_url: String,
    pub timeout_seconds: u64,
}

// RSS-лента с новостями
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    pub feed_url: String,
}

// Google Time Zone API; без ключа часовой пояс считается приблизительно
#[derive(Debug, Clone, Deserialize)]
pub struct TimezoneConfig {
    pub google_api_key: Option<String>,
    pub google_url: String,
}

// Tomorrow.io с запасным Weatherbit на случай 429
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub tomorrow_api_key: Option<String>,
    pub tomorrow_url: String,
    pub weatherbit_api_key: Option<String>,
    pub weatherbit_url: String,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

// LocationIQ autocomplete
#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    pub locationiq_api_key: Option<String>,
    pub locationiq_url: String,
    pub cache_ttl_seconds: u64,
    /// Запросов к LocationIQ в минуту
    pub rate_limit: u32,
}

/// Плоское представление переменных окружения.
#[derive(Debug, Deserialize)]
struct EnvVars {
    host: String,
    port: u16,
    environment: String,
    rust_log: String,
    log_format: String,
    next_public_api_url: String,
    backend_timeout_seconds: u64,
    news_feed_url: String,
    google_maps_api_key: Option<String>,
    google_timezone_url: String,
    tomorrow_io_api_key: Option<String>,
    tomorrow_io_url: String,
    weatherbit_api_key: Option<String>,
    weatherbit_url: String,
    weather_max_retries: u32,
    weather_retry_delay_ms: u64,
    locationiq_api_key: Option<String>,
    locationiq_url: String,
    location_cache_ttl_seconds: u64,
    location_rate_limit: u32,
}

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_NEWS_FEED_URL: &str = "https://www.iksurfmag.com/feed/";
pub const DEFAULT_GOOGLE_TIMEZONE_URL: &str = "https://maps.googleapis.com/maps/api/timezone/json";
pub const DEFAULT_TOMORROW_IO_URL: &str = "https://api.tomorrow.io/v4";
pub const DEFAULT_WEATHERBIT_URL: &str = "https://api.weatherbit.io/v2.0";
pub const DEFAULT_LOCATIONIQ_URL: &str = "https://api.locationiq.com/v1";

impl Config {
    /// Читает конфигурацию из окружения процесса (после `dotenvy::dotenv()`).
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Читает конфигурацию из явно переданного набора переменных.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self> {
        Self::load(Some(vars))
    }

    fn load(source: Option<Map<String, String>>) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000_i64)?
            .set_default("environment", "development")?
            .set_default("rust_log", "kitespot_gateway=debug,tower_http=debug")?
            .set_default("log_format", "pretty")?
            .set_default("next_public_api_url", DEFAULT_API_URL)?
            .set_default("backend_timeout_seconds", 30_i64)?
            .set_default("news_feed_url", DEFAULT_NEWS_FEED_URL)?
            .set_default("google_timezone_url", DEFAULT_GOOGLE_TIMEZONE_URL)?
            .set_default("tomorrow_io_url", DEFAULT_TOMORROW_IO_URL)?
            .set_default("weatherbit_url", DEFAULT_WEATHERBIT_URL)?
            .set_default("weather_max_retries", 3_i64)?
            .set_default("weather_retry_delay_ms", 1000_i64)?
            .set_default("locationiq_url", DEFAULT_LOCATIONIQ_URL)?
            .set_default("location_cache_ttl_seconds", 3600_i64)?
            .set_default("location_rate_limit", 10_i64)?
            .add_source(Environment::default().try_parsing(true).source(source))
            .build()
            .context("Failed to build configuration")?;

        let vars: EnvVars = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        let config = Config {
            app: AppConfig {
                host: vars.host,
                port: vars.port,
                environment: vars.environment,
                rust_log: vars.rust_log,
                log_format: vars.log_format.to_lowercase(),
            },
            backend: BackendConfig {
                api_url: vars.next_public_api_url.trim_end_matches('/').to_string(),
                timeout_seconds: vars.backend_timeout_seconds,
            },
            news: NewsConfig {
                feed_url: vars.news_feed_url,
            },
            timezone: TimezoneConfig {
                google_api_key: non_blank(vars.google_maps_api_key),
                google_url: vars.google_timezone_url,
            },
            weather: WeatherConfig {
                tomorrow_api_key: non_blank(vars.tomorrow_io_api_key),
                tomorrow_url: vars.tomorrow_io_url.trim_end_matches('/').to_string(),
                weatherbit_api_key: non_blank(vars.weatherbit_api_key),
                weatherbit_url: vars.weatherbit_url.trim_end_matches('/').to_string(),
                max_retries: vars.weather_max_retries,
                retry_delay_ms: vars.weather_retry_delay_ms,
            },
            locations: LocationConfig {
                locationiq_api_key: non_blank(vars.locationiq_api_key),
                locationiq_url: vars.locationiq_url.trim_end_matches('/').to_string(),
                cache_ttl_seconds: vars.location_cache_ttl_seconds,
                rate_limit: vars.location_rate_limit,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let urls = [
            ("NEXT_PUBLIC_API_URL", &self.backend.api_url),
            ("NEWS_FEED_URL", &self.news.feed_url),
            ("GOOGLE_TIMEZONE_URL", &self.timezone.google_url),
            ("TOMORROW_IO_URL", &self.weather.tomorrow_url),
            ("WEATHERBIT_URL", &self.weather.weatherbit_url),
            ("LOCATIONIQ_URL", &self.locations.locationiq_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("{name} must be an http or https URL, got '{url}'");
            }
        }

        if !["pretty", "json"].contains(&self.app.log_format.as_str()) {
            bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", self.app.log_format);
        }

        if self.backend.timeout_seconds == 0 || self.backend.timeout_seconds > 300 {
            bail!("BACKEND_TIMEOUT_SECONDS must be between 1 and 300");
        }

        if self.weather.max_retries > 10 {
            bail!("WEATHER_MAX_RETRIES must be at most 10");
        }
        if self.weather.retry_delay_ms == 0 {
            bail!("WEATHER_RETRY_DELAY_MS must be positive");
        }

        if self.locations.rate_limit == 0 {
            bail!("LOCATION_RATE_LIMIT must be positive");
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

// Пустой ключ в .env равнозначен отсутствующему
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_vars(Map::new()).unwrap();
        assert_eq!(config.backend.api_url, "http://localhost:8000");
        assert_eq!(config.backend.timeout_seconds, 30);
        assert_eq!(config.app.port, 3000);
        assert_eq!(config.news.feed_url, DEFAULT_NEWS_FEED_URL);
        assert!(config.timezone.google_api_key.is_none());
    }

    #[test]
    fn api_url_is_read_and_trimmed() {
        let config =
            Config::from_vars(vars(&[("NEXT_PUBLIC_API_URL", "https://api.example.com/")])).unwrap();
        assert_eq!(config.backend.api_url, "https://api.example.com");
    }

    #[test]
    fn port_must_be_numeric() {
        let result = Config::from_vars(vars(&[("PORT", "eighty")]));
        assert!(result.is_err());
    }

    #[test]
    fn api_url_must_be_http() {
        let err = Config::from_vars(vars(&[("NEXT_PUBLIC_API_URL", "localhost:8000")])).unwrap_err();
        assert!(err.to_string().contains("NEXT_PUBLIC_API_URL"));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(Config::from_vars(vars(&[("LOG_FORMAT", "xml")])).is_err());
        let config = Config::from_vars(vars(&[("LOG_FORMAT", "JSON")])).unwrap();
        assert_eq!(config.app.log_format, "json");
    }

    #[test]
    fn blank_google_key_counts_as_missing() {
        let config = Config::from_vars(vars(&[("GOOGLE_MAPS_API_KEY", "  ")])).unwrap();
        assert!(config.timezone.google_api_key.is_none());
    }

    #[test]
    fn weather_and_location_defaults() {
        let config = Config::from_vars(Map::new()).unwrap();
        assert_eq!(config.weather.tomorrow_url, DEFAULT_TOMORROW_IO_URL);
        assert_eq!(config.weather.weatherbit_url, DEFAULT_WEATHERBIT_URL);
        assert_eq!(config.weather.max_retries, 3);
        assert_eq!(config.weather.retry_delay_ms, 1000);
        assert!(config.weather.tomorrow_api_key.is_none());
        assert_eq!(config.locations.cache_ttl_seconds, 3600);
        assert_eq!(config.locations.rate_limit, 10);
    }

    #[test]
    fn weather_retry_bounds_are_checked() {
        assert!(Config::from_vars(vars(&[("WEATHER_MAX_RETRIES", "11")])).is_err());
        assert!(Config::from_vars(vars(&[("WEATHER_RETRY_DELAY_MS", "0")])).is_err());
        assert!(Config::from_vars(vars(&[("LOCATION_RATE_LIMIT", "0")])).is_err());

        let config = Config::from_vars(vars(&[
            ("WEATHER_MAX_RETRIES", "0"),
            ("TOMORROW_IO_API_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.weather.max_retries, 0);
        assert_eq!(config.weather.tomorrow_api_key.as_deref(), Some("secret"));
    }
}
