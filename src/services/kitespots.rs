use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

use crate::{
    error::{BackendError, BackendResult},
    models::KiteSpot,
    services::backend::{BackendClient, NO_QUERY},
};

/// Фильтры списка спотов, пробрасываются в бэкенд как есть.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KitespotFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

/// Доступ к спотам и прогнозам через бэкенд.
#[derive(Clone, Debug)]
pub struct KitespotService {
    backend: BackendClient,
}

impl KitespotService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Сырой JSON списка спотов, для проксирования без изменений.
    pub async fn list_raw(&self, filters: &KitespotFilters) -> BackendResult<Value> {
        self.backend.get_json("/api/kitespots", filters).await
    }

    /// Все споты в типизированном виде. `null` от бэкенда - пустой список.
    pub async fn get_all_kitespots(&self) -> BackendResult<Vec<KiteSpot>> {
        let raw = self.backend.get_json("/api/kitespots", NO_QUERY).await?;
        if raw.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(raw).map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Первый спот с точно совпадающим именем. Линейный поиск по всему списку.
    #[instrument(skip(self))]
    pub async fn get_kitespot_by_name(&self, name: &str) -> BackendResult<Option<KiteSpot>> {
        let spots = self.get_all_kitespots().await?;
        debug!("Searching {} kitespots by name", spots.len());
        Ok(find_by_name(spots, name))
    }

    #[instrument(skip(self))]
    pub async fn get_kitespot_by_id(&self, id: &str) -> BackendResult<Option<KiteSpot>> {
        let spots = self.get_all_kitespots().await?;
        Ok(spots.into_iter().find(|spot| spot.id.as_deref() == Some(id)))
    }

    /// Подсказки спотов по началу названия, ответ бэкенда отдаётся как есть.
    pub async fn autocomplete(&self, query: &str) -> BackendResult<Value> {
        self.backend
            .get_json("/api/kitespots/autocomplete", &[("query", query)])
            .await
    }

    pub async fn get_all_countries(&self) -> BackendResult<Vec<String>> {
        let spots = self.get_all_kitespots().await?;
        Ok(unique_countries(&spots))
    }

    /// Прогноз для спота; `None`, если бэкенд его не знает.
    #[instrument(skip(self))]
    pub async fn get_kitespot_forecast(&self, id: &str) -> BackendResult<Option<Value>> {
        let path = format!("/api/kitespots/{}/forecast", urlencoding::encode(id));
        self.backend.get_optional_json(&path).await
    }
}

pub fn find_by_name(spots: Vec<KiteSpot>, name: &str) -> Option<KiteSpot> {
    spots.into_iter().find(|spot| spot.name == name)
}

/// Отсортированный список стран без повторов и пустых значений.
pub fn unique_countries(spots: &[KiteSpot]) -> Vec<String> {
    spots
        .iter()
        .map(|spot| spot.country.as_str())
        .filter(|country| !country.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(name: &str, country: &str) -> KiteSpot {
        KiteSpot {
            id: None,
            name: name.to_string(),
            location: String::new(),
            country: country.to_string(),
            lat: 0.0,
            lng: 0.0,
            wind_probability: None,
            when_to_go: None,
            description: None,
            difficulty: None,
            water_type: None,
            best_months: None,
            facilities: None,
            overall_rating: None,
        }
    }

    #[test]
    fn name_lookup_is_exact_and_takes_first_match() {
        let mut first = spot("Tarifa", "Spain");
        first.location = "first".to_string();
        let mut second = spot("Tarifa", "Spain");
        second.location = "second".to_string();
        let spots = vec![spot("Dakhla", "Morocco"), first, second];

        let found = find_by_name(spots.clone(), "Tarifa").unwrap();
        assert_eq!(found.location, "first");
        assert!(find_by_name(spots.clone(), "tarifa").is_none());
        assert!(find_by_name(spots, "Nowhere").is_none());
    }

    #[test]
    fn countries_are_sorted_and_deduplicated() {
        let spots = vec![
            spot("Tarifa", "Spain"),
            spot("Dakhla", "Morocco"),
            spot("Fuerteventura", "Spain"),
            spot("Unknown", ""),
        ];
        assert_eq!(unique_countries(&spots), vec!["Morocco", "Spain"]);
    }
}
