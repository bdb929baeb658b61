use serde::{Deserialize, Serialize};
use tracing::warn;

/// Place details fetched from the third-party places service.
///
/// Every field is optional on the wire; missing values decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceData {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// One line per day, e.g. `"Monday: 11:00 AM – 9:00 PM"`
    pub weekday_hours: Vec<String>,
    pub categories: Vec<String>,
}

impl PlaceData {
    /// Decode place data cached on a validation history entry.
    ///
    /// Returns `None` for blank or malformed payloads.
    pub fn from_cached(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        match serde_json::from_str::<PlaceData>(raw) {
            Ok(place) => Some(place),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed cached place data");
                None
            }
        }
    }
}
