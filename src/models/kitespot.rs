use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Кайт-спот в том виде, в каком его отдаёт бэкенд.
///
/// Координаты принимаются и как `lat`/`lng`, и как `latitude`/`longitude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KiteSpot {
    #[serde(
        default,
        deserialize_with = "id_from_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub country: String,
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lng: f64,
    #[serde(default, alias = "wind_probability", skip_serializing_if = "Option::is_none")]
    pub wind_probability: Option<f64>,
    #[serde(default, alias = "when_to_go", skip_serializing_if = "Option::is_none")]
    pub when_to_go: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // Поля, которые бэкенд присылает в snake_case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, rename = "water_type", skip_serializing_if = "Option::is_none")]
    pub water_type: Option<String>,
    #[serde(default, rename = "best_months", skip_serializing_if = "Option::is_none")]
    pub best_months: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facilities: Option<Vec<String>>,
    #[serde(default, rename = "overall_rating", skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<f64>,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(D::Error::custom(format!("invalid kitespot id: {other}"))),
    }
}
