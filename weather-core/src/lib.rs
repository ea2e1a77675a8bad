//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its Visual Crossing implementation
//! - The single-record weather cache and the lookup coordinator
//! - A headless view model with debounced input
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod cache;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod view;

pub use cache::{FileStore, KeyValueStore, MemoryStore, WeatherCache};
pub use config::Config;
pub use error::{CacheError, ErrorKind, WeatherError};
pub use lookup::WeatherLookup;
pub use model::WeatherRecord;
pub use provider::{WeatherProvider, visualcrossing::VisualCrossingProvider};
pub use view::{Capabilities, Theme, ViewOptions, ViewState, WeatherView};
