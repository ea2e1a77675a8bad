use weather_core::{Theme, ViewState, WeatherRecord};

/// Status line: loading, refreshing or error. `None` when idle.
pub fn status_line(state: &ViewState) -> Option<String> {
    if state.refreshing {
        Some("Refreshing...".to_string())
    } else if state.loading {
        Some("Loading...".to_string())
    } else {
        state.error.as_ref().map(|err| format!("Error: {err}"))
    }
}

pub fn record_panel(record: &WeatherRecord, theme: Theme) -> String {
    let rule = match theme {
        Theme::Light => "-",
        Theme::Dark => "=",
    }
    .repeat(32);

    format!(
        "{rule}\n{}\nTemperature: {}°C\nHumidity: {}%\nWind Speed: {} km/h\nCondition: {}\n{rule}",
        record.city,
        record.temperature_c,
        record.humidity_pct,
        record.wind_speed_kmh,
        record.condition,
    )
}

/// Full screen for the interactive view.
pub fn render(state: &ViewState) -> String {
    let mut out = Vec::new();
    if let Some(status) = status_line(state) {
        out.push(status);
    }
    if let Some(record) = &state.record {
        out.push(record_panel(record, state.theme));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> WeatherRecord {
        WeatherRecord {
            city: "Paris, France".into(),
            temperature_c: 18.0,
            humidity_pct: 60.0,
            wind_speed_kmh: 12.5,
            condition: "Partly cloudy".into(),
        }
    }

    #[test]
    fn panel_lists_all_fields() {
        let panel = record_panel(&paris(), Theme::Light);

        assert!(panel.contains("Paris, France"));
        assert!(panel.contains("Temperature: 18°C"));
        assert!(panel.contains("Humidity: 60%"));
        assert!(panel.contains("Wind Speed: 12.5 km/h"));
        assert!(panel.contains("Condition: Partly cloudy"));
        assert!(panel.starts_with("---"));
    }

    #[test]
    fn dark_theme_changes_rule() {
        assert!(record_panel(&paris(), Theme::Dark).starts_with("==="));
    }

    #[test]
    fn status_prefers_refreshing_then_loading_then_error() {
        let mut state = ViewState {
            loading: true,
            refreshing: true,
            error: Some("City not found".into()),
            ..ViewState::default()
        };
        assert_eq!(status_line(&state).as_deref(), Some("Refreshing..."));

        state.refreshing = false;
        assert_eq!(status_line(&state).as_deref(), Some("Loading..."));

        state.loading = false;
        assert_eq!(status_line(&state).as_deref(), Some("Error: City not found"));

        state.error = None;
        assert_eq!(status_line(&state), None);
    }

    #[test]
    fn render_shows_error_above_last_record() {
        let state = ViewState {
            error: Some("City not found".into()),
            record: Some(paris()),
            ..ViewState::default()
        };

        let screen = render(&state);
        assert!(screen.starts_with("Error: City not found\n"));
        assert!(screen.contains("Condition: Partly cloudy"));
    }

    #[test]
    fn render_idle_empty_state_is_blank() {
        assert_eq!(render(&ViewState::default()), "");
    }
}
