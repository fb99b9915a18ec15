//! Подсказки мест через LocationIQ.
//!
//! Ответы кешируются в `moka` на `cache_ttl_seconds`. Поверх кеша стоит
//! оконный лимит запросов; при его превышении или сбое LocationIQ
//! отдаются подходящие места из [`KNOWN_LOCATIONS`].

use moka::future::Cache;
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::{
    config::LocationConfig,
    error::{BackendError, BackendResult},
    models::{filter_locations, KnownLocation, FALLBACK_LOCATION_COUNT, KNOWN_LOCATIONS},
    services::backend::send_json,
};

pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);
const LOCATIONIQ_TIMEOUT: Duration = Duration::from_secs(5);
const CACHE_CAPACITY: u64 = 10_000;

/// Скользящее окно: не больше `max_requests` за `window`.
#[derive(Debug)]
pub struct WindowRateLimiter {
    window: Duration,
    max_requests: usize,
    log: Mutex<VecDeque<Instant>>,
}

impl WindowRateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            log: Mutex::new(VecDeque::new()),
        }
    }

    /// Регистрирует запрос и сообщает, превышен ли лимит.
    /// Отклонённые запросы тоже попадают в журнал.
    pub fn is_limited(&self) -> bool {
        self.is_limited_at(Instant::now())
    }

    fn is_limited_at(&self, now: Instant) -> bool {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        while log
            .front()
            .is_some_and(|&at| now.saturating_duration_since(at) >= self.window)
        {
            log.pop_front();
        }
        let limited = log.len() >= self.max_requests;
        log.push_back(now);
        limited
    }
}

/// Откуда взяты подсказки.
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestions {
    Cached(Value),
    Fresh(Value),
    /// Лимит исчерпан, отданы известные места.
    RateLimited(Vec<KnownLocation>),
    /// LocationIQ не ответил, отданы известные места.
    Fallback(Vec<KnownLocation>),
}

#[derive(Clone)]
pub struct LocationService {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    cache: Cache<String, Value>,
    limiter: Arc<WindowRateLimiter>,
}

impl fmt::Debug for LocationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationService")
            .field("base_url", &self.base_url)
            .field("cached_entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl LocationService {
    pub fn new(http_client: reqwest::Client, config: &LocationConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .build();

        Self {
            http_client,
            api_key: config.locationiq_api_key.clone(),
            base_url: config.locationiq_url.clone(),
            cache,
            limiter: Arc::new(WindowRateLimiter::new(
                RATE_LIMIT_WINDOW,
                config.rate_limit as usize,
            )),
        }
    }

    pub fn rate_limit(&self) -> usize {
        self.limiter.max_requests
    }

    /// Кеш -> лимит -> LocationIQ -> известные места.
    ///
    /// Ошибка возвращается только если LocationIQ не ответил и среди
    /// известных мест нет подходящих.
    pub async fn autocomplete(
        &self,
        query: &str,
        limit: usize,
        dedupe: &str,
    ) -> BackendResult<Suggestions> {
        let cache_key = format!("{}_{}_{}", query.to_lowercase(), limit, dedupe);
        if let Some(data) = self.cache.get(&cache_key).await {
            debug!("Using cached results for query: {}", query);
            return Ok(Suggestions::Cached(data));
        }

        let fallback = &KNOWN_LOCATIONS[..FALLBACK_LOCATION_COUNT];
        if self.limiter.is_limited() {
            warn!("Rate limit exceeded for location autocomplete");
            return Ok(Suggestions::RateLimited(filter_locations(fallback, query, limit)));
        }

        match self.fetch(query, limit, dedupe).await {
            Ok(data) => {
                info!(
                    "Received {} location suggestions",
                    data.as_array().map_or(0, Vec::len)
                );
                self.cache.insert(cache_key, data.clone()).await;
                Ok(Suggestions::Fresh(data))
            }
            Err(e) => {
                error!("Error fetching location autocomplete: {}", e);
                let matches = filter_locations(fallback, query, limit);
                if matches.is_empty() {
                    Err(e)
                } else {
                    Ok(Suggestions::Fallback(matches))
                }
            }
        }
    }

    async fn fetch(&self, query: &str, limit: usize, dedupe: &str) -> BackendResult<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(BackendError::NotConfigured("LOCATIONIQ_API_KEY"))?;

        let limit = limit.to_string();
        let request = self
            .http_client
            .get(format!("{}/autocomplete", self.base_url))
            .timeout(LOCATIONIQ_TIMEOUT)
            .query(&[
                ("key", api_key),
                ("q", query),
                ("limit", limit.as_str()),
                ("dedupe", dedupe),
                ("format", "json"),
            ]);

        send_json(request).await
    }
}

/// Подсказки только из известных мест, без внешних запросов.
pub fn mock_locations(query: &str, limit: usize) -> Vec<KnownLocation> {
    filter_locations(&KNOWN_LOCATIONS, query, limit)
}
