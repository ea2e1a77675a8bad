//! Headless view model for interactive lookups.
//!
//! [`WeatherView`] owns the input debounce and publishes [`ViewState`] through a
//! `watch` channel so any front end can render it.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{sync::watch, task::JoinHandle};

use crate::{WeatherError, WeatherLookup, WeatherRecord, config::DEFAULT_DEBOUNCE_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Optional behaviours a view may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub theming: bool,
    pub pull_to_refresh: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            theming: true,
            pull_to_refresh: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Quiet period after the last keystroke before a lookup is issued.
    pub debounce: Duration,
    pub capabilities: Capabilities,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            capabilities: Capabilities::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub city: String,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
    pub record: Option<WeatherRecord>,
    pub theme: Theme,
}

pub struct WeatherView {
    lookup: Arc<WeatherLookup>,
    shared: Arc<Shared>,
    options: ViewOptions,
    pending: Option<JoinHandle<()>>,
}

/// State shared with detached lookup tasks.
///
/// Lookups are never cancelled once started, so several may overlap. `loading`
/// stays set while any is in flight, and a result is shown only if no
/// later-issued lookup has already been shown.
#[derive(Debug)]
struct Shared {
    state: watch::Sender<ViewState>,
    lookups: Mutex<LookupCounters>,
}

#[derive(Debug, Default)]
struct LookupCounters {
    in_flight: usize,
    issued: u64,
    shown: u64,
}

impl Shared {
    /// Marks a lookup as started and returns its sequence number.
    fn begin(&self) -> u64 {
        let mut seq = 0;
        self.state.send_modify(|s| {
            let mut lookups = self.lookups.lock();
            lookups.in_flight += 1;
            lookups.issued += 1;
            seq = lookups.issued;
            s.loading = true;
            s.error = None;
        });
        seq
    }

    fn finish(&self, seq: u64, city: &str, outcome: Result<WeatherRecord, WeatherError>) {
        self.state.send_modify(|s| {
            let mut lookups = self.lookups.lock();
            lookups.in_flight -= 1;
            s.loading = lookups.in_flight > 0;

            if seq < lookups.shown {
                tracing::debug!(%city, "discarding result superseded by a newer lookup");
                return;
            }
            lookups.shown = seq;

            match outcome {
                Ok(record) => {
                    s.record = Some(record);
                    s.error = None;
                }
                Err(err) => {
                    tracing::debug!(%city, error = %err, "lookup failed");
                    s.error = Some(err.user_message());
                }
            }
        });
    }
}

impl WeatherView {
    pub fn new(lookup: Arc<WeatherLookup>, options: ViewOptions) -> Self {
        let (state, _) = watch::channel(ViewState::default());

        Self {
            lookup,
            shared: Arc::new(Shared {
                state,
                lookups: Mutex::new(LookupCounters::default()),
            }),
            options,
            pending: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> ViewState {
        self.shared.state.borrow().clone()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.options.capabilities
    }

    /// Shows the cached record, if any, before the first lookup.
    pub async fn mount(&self) {
        match self.lookup.last_cached().await {
            Ok(Some(record)) => self.shared.state.send_modify(|s| s.record = Some(record)),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "could not read cached weather"),
        }
    }

    /// Records new input text and restarts the debounce timer.
    pub fn on_city_changed(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.shared.state.send_modify(|s| s.city.clone_from(&text));
        self.cancel_pending();

        let lookup = Arc::clone(&self.lookup);
        let shared = Arc::clone(&self.shared);
        let delay = self.options.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Spawned separately: aborting the timer must not abort a started lookup.
            tokio::spawn(async move { run_lookup(&lookup, &shared, &text).await });
        }));
    }

    /// Looks up the current city now, dropping any pending debounced lookup.
    pub async fn search(&mut self) {
        self.cancel_pending();
        let city = self.shared.state.borrow().city.clone();
        run_lookup(&self.lookup, &self.shared, &city).await;
    }

    /// Re-fetches the current city. No-op without pull-to-refresh.
    pub async fn refresh(&mut self) {
        if !self.options.capabilities.pull_to_refresh {
            return;
        }

        let city = self.shared.state.borrow().city.clone();
        if city.trim().is_empty() {
            return;
        }

        self.shared.state.send_modify(|s| s.refreshing = true);
        run_lookup(&self.lookup, &self.shared, &city).await;
        self.shared.state.send_modify(|s| s.refreshing = false);
    }

    /// Returns the theme in effect afterwards.
    pub fn toggle_theme(&mut self) -> Theme {
        if self.options.capabilities.theming {
            self.shared.state.send_modify(|s| s.theme = s.theme.toggled());
        }
        self.shared.state.borrow().theme
    }

    pub fn unmount(&mut self) {
        self.cancel_pending();
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for WeatherView {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

async fn run_lookup(lookup: &WeatherLookup, shared: &Shared, city: &str) {
    if city.trim().is_empty() {
        return;
    }

    let seq = shared.begin();
    let outcome = lookup.get_weather(city).await;
    shared.finish(seq, city, outcome);
}
