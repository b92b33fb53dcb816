use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from OpenWeatherMap condition ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    FreezingRain,
    Snow,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    /// Convert an OpenWeatherMap condition id to a WeatherCondition
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_owm_code(code: i32) -> Self {
        match code {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            511 => Self::FreezingRain,
            500..=599 => Self::Rain,
            600..=699 => Self::Snow,
            700..=799 => Self::Fog,
            800 => Self::Clear,
            801 | 802 => Self::PartlyCloudy,
            803 | 804 => Self::Cloudy,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing Rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }

    /// Glyph shown next to the temperature
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::PartlyCloudy => "⛅",
            Self::Cloudy => "☁️",
            Self::Fog => "🌫️",
            Self::Drizzle => "🌦️",
            Self::Rain => "🌧️",
            Self::FreezingRain => "🌨️",
            Self::Snow => "❄️",
            Self::Thunderstorm => "⛈️",
            Self::Unknown => "🌡️",
        }
    }
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// What the user asked for: a typed city or a device position
#[derive(Debug, Clone, PartialEq)]
pub enum SearchQuery {
    City(String),
    Position(Coordinates),
}

/// One geocoding result as returned by `/geo/1.0/direct` and `/geo/1.0/reverse`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPlace {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
    pub state: Option<String>,
}

/// Autocomplete entry shown under the search input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    /// State when the provider knows it, otherwise the country code
    pub region: String,
}

impl CitySuggestion {
    /// Text inserted into the input when the suggestion is picked
    pub fn label(&self) -> String {
        if self.region.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.region)
        }
    }
}

impl From<GeoPlace> for CitySuggestion {
    fn from(place: GeoPlace) -> Self {
        let region = place
            .state
            .filter(|s| !s.is_empty())
            .unwrap_or(place.country);
        Self {
            name: place.name,
            region,
        }
    }
}

/// Temperature and atmosphere block shared by current and forecast payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    pub humidity: u8,
    #[serde(default)]
    pub pressure: Option<f64>,
}

/// Provider condition descriptor (`weather[]` element)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionInfo {
    pub id: i32,
    pub main: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SysInfo {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
}

/// Current conditions (`/weather`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub name: String,
    /// Observation time, unix seconds
    pub dt: i64,
    /// Shift from UTC in seconds
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub sys: SysInfo,
    pub main: MainReadings,
    pub weather: Vec<ConditionInfo>,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub visibility: Option<u32>,
}

impl CurrentWeather {
    pub fn condition(&self) -> WeatherCondition {
        self.weather
            .first()
            .map(|w| WeatherCondition::from_owm_code(w.id))
            .unwrap_or(WeatherCondition::Unknown)
    }

    /// Provider's own wording, e.g. "light rain"
    pub fn condition_text(&self) -> &str {
        self.weather
            .first()
            .map(|w| w.description.as_str())
            .unwrap_or_default()
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }

    /// "Paris, FR" or just "Paris" when no country is reported
    pub fn location_label(&self) -> String {
        match self.sys.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// One 3-hourly forecast step (`/forecast` `list[]` element)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<ConditionInfo>,
    #[serde(default)]
    pub wind: Wind,
    /// Probability of precipitation, 0.0 to 1.0
    #[serde(default)]
    pub pop: Option<f64>,
    #[serde(default)]
    pub dt_txt: Option<String>,
}

impl ForecastEntry {
    pub fn condition(&self) -> WeatherCondition {
        self.weather
            .first()
            .map(|w| WeatherCondition::from_owm_code(w.id))
            .unwrap_or(WeatherCondition::Unknown)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastCity {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub timezone: i32,
}

/// Forecast payload (`/forecast`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
    #[serde(default)]
    pub city: Option<ForecastCity>,
}

/// Schema checks run after deserialization, before anything is rendered
pub trait ResponseSchema {
    fn validate(&self) -> Result<(), String>;
}

impl ResponseSchema for CurrentWeather {
    fn validate(&self) -> Result<(), String> {
        if self.weather.is_empty() {
            return Err("current conditions carry no weather descriptor".to_string());
        }
        if !self.main.temp.is_finite() {
            return Err("current temperature is not a number".to_string());
        }
        Ok(())
    }
}

impl ResponseSchema for ForecastResponse {
    fn validate(&self) -> Result<(), String> {
        for entry in &self.list {
            if entry.weather.is_empty() {
                return Err(format!("forecast entry {} carries no weather descriptor", entry.dt));
            }
            if !entry.main.temp.is_finite() {
                return Err(format!("forecast entry {} has no usable temperature", entry.dt));
            }
        }
        Ok(())
    }
}

impl ResponseSchema for Vec<GeoPlace> {
    fn validate(&self) -> Result<(), String> {
        match self
            .iter()
            .find(|p| !Coordinates::new(p.lat, p.lon).is_valid())
        {
            Some(place) => Err(format!("place {} has out-of-range coordinates", place.name)),
            None => Ok(()),
        }
    }
}

/// Device location errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Position unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Geolocation not supported")]
    Unsupported,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Request cancelled")]
    Cancelled,
    #[error("API Error {status}: {body}")]
    ApiStatus { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("No place found for coordinates")]
    LocationUnresolved,
    #[error("Location service error: {0}")]
    LocationService(String),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Favorites store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Stored value is malformed: {0}")]
    Parse(String),
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),
}
