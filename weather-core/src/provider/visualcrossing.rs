use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{WeatherError, WeatherRecord, config::DEFAULT_ENDPOINT};

use super::WeatherProvider;

/// Fetches today's conditions from the Visual Crossing timeline API.
#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    endpoint: Url,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: String, endpoint: &str) -> Result<Self, WeatherError> {
        let endpoint = Url::parse(endpoint)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| WeatherError::InvalidEndpoint(endpoint.to_string()))?;

        Ok(Self {
            api_key,
            endpoint,
            http: Client::new(),
        })
    }

    fn city_url(&self, city: &str) -> Result<Url, WeatherError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| WeatherError::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(city);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VcTimelineResponse {
    resolved_address: String,
    #[serde(default)]
    days: Vec<VcDay>,
}

#[derive(Debug, Deserialize)]
struct VcDay {
    temp: f64,
    humidity: f64,
    windspeed: f64,
    conditions: String,
}

impl VcTimelineResponse {
    /// The first day in the list is today.
    fn into_record(self) -> Result<WeatherRecord, WeatherError> {
        let today = self.days.into_iter().next().ok_or(WeatherError::NoDailyData)?;

        Ok(WeatherRecord {
            city: self.resolved_address,
            temperature_c: today.temp,
            humidity_pct: today.humidity,
            wind_speed_kmh: today.windspeed,
            condition: today.conditions,
        })
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    async fn get_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        if city.trim().is_empty() {
            return Err(WeatherError::EmptyCity);
        }

        let url = self.city_url(city)?;
        tracing::debug!(%city, "requesting Visual Crossing timeline");

        let res = self
            .http
            .get(url)
            .query(&[
                ("unitGroup", "metric"),
                ("key", self.api_key.as_str()),
                ("contentType", "json"),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            // Body is only logged; failing to read it must not mask the status.
            let body = res.text().await.unwrap_or_default();
            tracing::debug!(%city, %status, body = %truncate_body(&body), "lookup rejected");
            return Err(WeatherError::NotFound { status });
        }

        let body = res.text().await?;
        let parsed: VcTimelineResponse = serde_json::from_str(&body)?;
        parsed.into_record()
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
