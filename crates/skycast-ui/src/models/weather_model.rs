//! View state for the weather screen and the projections that fill it.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use skycast_core::UiState;
use skycast_weather::{CurrentWeather, ForecastEntry, WeatherCondition};

/// Number of daily cards shown in the forecast panel
pub const FORECAST_DAYS: usize = 5;

/// Everything the screen shows. The controller is the only writer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherView {
    pub input: String,
    pub state: UiState,
    pub error_message: Option<String>,
    /// `None` while hidden
    pub current: Option<CurrentPanel>,
    /// Empty while hidden
    pub forecast: Vec<ForecastCard>,
    pub suggestions: Vec<String>,
    pub favorites: Vec<String>,
}

impl WeatherView {
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Enter Loading: hide the error and both panels
    pub fn begin_loading(&mut self) {
        self.state = self.state.on_start();
        self.error_message = None;
        self.current = None;
        self.forecast.clear();
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.state = self.state.on_failure();
        self.error_message = Some(message.into());
        self.current = None;
        self.forecast.clear();
    }

    pub fn show_results(&mut self, current: CurrentPanel, forecast: Vec<ForecastCard>) {
        self.state = self.state.on_success();
        self.error_message = None;
        self.current = Some(current);
        self.forecast = forecast;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentPanel {
    pub location: String,
    pub temperature: String,
    pub feels_like: String,
    pub description: String,
    pub icon: &'static str,
    pub humidity: String,
    pub wind: String,
    /// Local observation time, "HH:MM"
    pub observed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub date: NaiveDate,
    /// Short weekday, e.g. "Mon"
    pub day: String,
    pub high: String,
    pub low: String,
    pub description: &'static str,
    pub icon: &'static str,
    /// Highest chance of precipitation across the day, e.g. "40%"
    pub precipitation: Option<String>,
}

/// Round half up to a whole degree: 12.5 → "13°C", -0.4 → "0°C"
pub fn format_temperature(celsius: f64) -> String {
    let rounded = (celsius + 0.5).floor() as i64;
    format!("{rounded}°C")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// Out-of-range offsets fall back to UTC
fn offset(utc_offset_secs: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_secs).unwrap_or_else(|| Utc.fix())
}

fn local_time(ts: DateTime<Utc>, utc_offset_secs: i32) -> DateTime<FixedOffset> {
    ts.with_timezone(&offset(utc_offset_secs))
}

/// Project current conditions onto the current-weather panel
pub fn render_current(data: &CurrentWeather) -> CurrentPanel {
    let condition = data.condition();
    let description = match data.condition_text() {
        "" => condition.description().to_string(),
        text => capitalize(text),
    };

    CurrentPanel {
        location: data.location_label(),
        temperature: format_temperature(data.main.temp),
        feels_like: format_temperature(data.main.feels_like),
        description,
        icon: condition.icon(),
        humidity: format!("{}%", data.main.humidity),
        wind: format!("{:.1} m/s", data.wind.speed),
        observed_at: data
            .observed_at()
            .map(|ts| local_time(ts, data.timezone).format("%H:%M").to_string()),
    }
}

struct DaySummary {
    high: f64,
    low: f64,
    pop: Option<f64>,
    /// Entry closest to local noon decides the condition
    noon_distance: u32,
    condition: WeatherCondition,
}

/// Group 3-hourly forecast steps into daily cards, in local time
pub fn render_forecast(entries: &[ForecastEntry], utc_offset_secs: i32) -> Vec<ForecastCard> {
    let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();

    for entry in entries {
        let Some(ts) = entry.timestamp() else {
            continue;
        };
        let local = local_time(ts, utc_offset_secs);
        let high = entry.main.temp_max.unwrap_or(entry.main.temp).max(entry.main.temp);
        let low = entry.main.temp_min.unwrap_or(entry.main.temp).min(entry.main.temp);
        let noon_distance = local.hour().abs_diff(12);

        match days.get_mut(&local.date_naive()) {
            Some(day) => {
                day.high = day.high.max(high);
                day.low = day.low.min(low);
                day.pop = match (day.pop, entry.pop) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    (a, b) => a.or(b),
                };
                if noon_distance < day.noon_distance {
                    day.noon_distance = noon_distance;
                    day.condition = entry.condition();
                }
            }
            None => {
                days.insert(
                    local.date_naive(),
                    DaySummary {
                        high,
                        low,
                        pop: entry.pop,
                        noon_distance,
                        condition: entry.condition(),
                    },
                );
            }
        }
    }

    days.into_iter()
        .take(FORECAST_DAYS)
        .map(|(date, day)| ForecastCard {
            date,
            day: date.format("%a").to_string(),
            high: format_temperature(day.high),
            low: format_temperature(day.low),
            description: day.condition.description(),
            icon: day.condition.icon(),
            precipitation: day.pop.map(|p| format!("{}%", (p * 100.0).round() as i64)),
        })
        .collect()
}
