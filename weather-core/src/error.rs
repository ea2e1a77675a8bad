use reqwest::StatusCode;

/// Shown in place of an empty error message.
const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Errors raised while looking up weather for a city.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The endpoint answered with a non-success status.
    #[error("City not found")]
    NotFound { status: StatusCode },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Weather response contained no daily data")]
    NoDailyData,

    #[error("City name must not be empty")]
    EmptyCity,

    #[error("Invalid weather endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("Failed to cache weather: {0}")]
    Cache(#[from] CacheError),
}

/// Coarse classification of [`WeatherError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LookupFailed,
    TransportOrParsingFailed,
    Cache,
    InvalidInput,
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::NotFound { .. } => ErrorKind::LookupFailed,
            WeatherError::Transport(_) | WeatherError::Parse(_) | WeatherError::NoDailyData => {
                ErrorKind::TransportOrParsingFailed
            }
            WeatherError::Cache(_) => ErrorKind::Cache,
            WeatherError::EmptyCity | WeatherError::InvalidEndpoint(_) => ErrorKind::InvalidInput,
        }
    }

    /// Text suitable for the view's error line.
    pub fn user_message(&self) -> String {
        message_or_fallback(self.to_string())
    }
}

/// Every current variant has Display text; this guards variants wrapping
/// foreign errors whose message may be blank.
fn message_or_fallback(message: String) -> String {
    if message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

/// Errors from the local key-value store.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}
