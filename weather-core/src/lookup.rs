use std::sync::Arc;

use crate::{
    CacheError, Config, WeatherError, WeatherRecord,
    cache::{FileStore, WeatherCache},
    provider::{WeatherProvider, provider_from_config},
};

/// Fetch-then-cache orchestration over a provider and the weather cache.
#[derive(Debug, Clone)]
pub struct WeatherLookup {
    provider: Arc<dyn WeatherProvider>,
    cache: WeatherCache,
}

impl WeatherLookup {
    pub fn new(provider: Arc<dyn WeatherProvider>, cache: WeatherCache) -> Self {
        Self { provider, cache }
    }

    /// Wire the configured provider to a file-backed cache.
    pub fn from_config(config: &Config, api_key_override: Option<&str>) -> anyhow::Result<Self> {
        let provider: Arc<dyn WeatherProvider> =
            Arc::from(provider_from_config(config, api_key_override)?);
        let store = FileStore::new(config.cache_dir()?);

        Ok(Self::new(provider, WeatherCache::new(Arc::new(store))))
    }

    /// Fetches current weather and stores it as the last known record.
    ///
    /// A failed fetch returns before the cache is touched.
    pub async fn get_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        let record = self.provider.get_weather(city).await?;
        self.cache.save(&record).await?;
        tracing::debug!(city = %record.city, "cached latest weather");
        Ok(record)
    }

    pub async fn last_cached(&self) -> Result<Option<WeatherRecord>, CacheError> {
        self.cache.load().await
    }
}
