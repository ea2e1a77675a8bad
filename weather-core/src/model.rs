use serde::{Deserialize, Serialize};

/// Current conditions for a resolved city, as displayed and cached.
///
/// Serialized field names (`temp`, `windSpeed`, ...) are the on-disk cache format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    #[serde(rename = "temp")]
    pub temperature_c: f64,
    #[serde(rename = "humidity")]
    pub humidity_pct: f64,
    #[serde(rename = "windSpeed")]
    pub wind_speed_kmh: f64,
    pub condition: String,
}
