use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZoneInfo {
    pub time_zone_id: String,
    pub time_zone_name: String,
    /// Смещение от UTC в секундах без учёта летнего времени.
    pub raw_offset: i64,
    pub dst_offset: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximated: Option<bool>,
}
