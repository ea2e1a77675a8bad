use crate::{Config, WeatherError, WeatherRecord, provider::visualcrossing::VisualCrossingProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod visualcrossing;

/// Source of current weather for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError>;
}

/// Construct the provider from config, with an optional API key override.
pub fn provider_from_config(
    config: &Config,
    api_key_override: Option<&str>,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolve_api_key(api_key_override)?;
    let provider = VisualCrossingProvider::with_endpoint(api_key, config.endpoint())?;

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg, None).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_rejects_bad_endpoint() {
        let cfg = Config {
            endpoint: Some("not a url".into()),
            ..Config::default()
        };
        let err = provider_from_config(&cfg, Some("KEY")).unwrap_err();
        assert!(err.to_string().contains("Invalid weather endpoint"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        assert!(provider_from_config(&cfg, None).is_ok());
    }
}
