//! Local persistence for the most recent weather record.
//!
//! [`KeyValueStore`] is the storage seam; [`WeatherCache`] keeps exactly one
//! record under [`LAST_WEATHER_KEY`], overwritten on every successful lookup.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    fmt::Debug,
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};
use tempfile::NamedTempFile;

use crate::{CacheError, WeatherRecord};

pub const LAST_WEATHER_KEY: &str = "last_weather";

/// String key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    async fn get_item(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let dir = self.dir.clone();
        let path = self.path_for(key);
        let value = value.to_owned();

        // Each write gets its own temp file, renamed over the target, so
        // concurrent writers never share a partial file.
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(value.as_bytes())?;
            tmp.persist(&path)?;
            Ok(())
        })
        .await
        .map_err(io::Error::other)??;
        Ok(())
    }
}

/// In-process store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.items.lock().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Holds the single most recent [`WeatherRecord`].
#[derive(Debug, Clone)]
pub struct WeatherCache {
    store: Arc<dyn KeyValueStore>,
}

impl WeatherCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, record: &WeatherRecord) -> Result<(), CacheError> {
        let json = serde_json::to_string(record)?;
        self.store.set_item(LAST_WEATHER_KEY, &json).await
    }

    /// A stored value that no longer deserializes is reported as absent.
    pub async fn load(&self) -> Result<Option<WeatherRecord>, CacheError> {
        let Some(json) = self.store.get_item(LAST_WEATHER_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed cached weather record");
                Ok(None)
            }
        }
    }
}
