use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `api.api_key`
pub const API_KEY_ENV: &str = "SKYCAST_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory (favorites live here too)
    pub config_dir: PathBuf,

    /// Weather and geocoding API settings
    pub api: ApiConfig,

    /// Autocomplete and search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Device location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Favorites persistence settings
    #[serde(default)]
    pub favorites: FavoritesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OpenWeatherMap API key (can be set via `SKYCAST_API_KEY`)
    pub api_key: String,

    /// Base URL for `/weather` and `/forecast`
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,

    /// Base URL for `/direct` and `/reverse` geocoding
    #[serde(default = "default_geo_base_url")]
    pub geo_base_url: String,

    /// Per-request time bound in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geo_base_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl ApiConfig {
    /// Check if the API key is configured (not a placeholder)
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_key.starts_with("YOUR_")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: "YOUR_API_KEY".to_string(),
            weather_base_url: default_weather_base_url(),
            geo_base_url: default_geo_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before an autocomplete request fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Shortest trimmed input that triggers autocomplete
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Maximum number of suggestions requested
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: u8,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_suggestion_limit() -> u8 {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Whether a device location capability is exposed at all
    #[serde(default)]
    pub enabled: bool,

    /// Fixed position reported by the location capability
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,

    /// Position acquisition timeout in seconds
    #[serde(default = "default_location_timeout")]
    pub timeout_secs: u64,

    /// Oldest cached fix accepted, in seconds
    #[serde(default = "default_maximum_age")]
    pub maximum_age_secs: u64,
}

fn default_high_accuracy() -> bool {
    true
}

fn default_location_timeout() -> u64 {
    15
}

fn default_maximum_age() -> u64 {
    60
}

impl LocationConfig {
    /// Configured coordinates, if location is enabled and both are set
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        if !self.enabled {
            return None;
        }
        self.latitude.zip(self.longitude)
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            latitude: None,
            longitude: None,
            high_accuracy: default_high_accuracy(),
            timeout_secs: default_location_timeout(),
            maximum_age_secs: default_maximum_age(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesConfig {
    /// Key under which the favorites list is stored
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Store file name inside `config_dir`
    #[serde(default = "default_store_file")]
    pub file_name: String,
}

fn default_storage_key() -> String {
    "weatherFavorites".to_string()
}

fn default_store_file() -> String {
    "favorites.json".to_string()
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            file_name: default_store_file(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            api: ApiConfig::default(),
            search: SearchConfig::default(),
            location: LocationConfig::default(),
            favorites: FavoritesConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, creating a default file if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let contents =
                std::fs::read_to_string(config_path).context("Failed to read config file")?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        Ok((config, validation))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.api_key = key.trim().to_string();
            }
        }
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.api.weather_base_url, "api.weather_base_url", &mut result);
        self.validate_url(&self.api.geo_base_url, "api.geo_base_url", &mut result);

        if !self.api.is_configured() {
            result.add_warning(
                "api.api_key",
                format!("API key not configured - set it in config.toml or {}", API_KEY_ENV),
            );
        }

        if self.api.request_timeout_secs == 0 {
            result.add_error("api.request_timeout_secs", "Request timeout must be greater than 0");
        }

        if self.search.debounce_ms > 5000 {
            result.add_warning("search.debounce_ms", "Debounce is unusually long (>5s)");
        }

        if self.search.suggestion_limit == 0 {
            result.add_warning("search.suggestion_limit", "Autocomplete disabled (limit 0)");
        }

        if self.location.enabled {
            match (self.location.latitude, self.location.longitude) {
                (Some(lat), Some(lon)) => {
                    if !(-90.0..=90.0).contains(&lat) {
                        result.add_error("location.latitude", "Latitude must be -90 to 90");
                    }
                    if !(-180.0..=180.0).contains(&lon) {
                        result.add_error("location.longitude", "Longitude must be -180 to 180");
                    }
                }
                _ => result.add_warning(
                    "location",
                    "Location enabled but no coordinates set - geolocation will be unavailable",
                ),
            }
        }

        if self.favorites.storage_key.is_empty() {
            result.add_error("favorites.storage_key", "Storage key cannot be empty");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Path of the favorites store file
    pub fn favorites_path(&self) -> PathBuf {
        self.config_dir.join(&self.favorites.file_name)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}
