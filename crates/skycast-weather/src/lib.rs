//! Weather service for Skycast
//!
//! Provides current conditions and forecasts from OpenWeatherMap, city
//! geocoding, a device location seam and a persisted favorites list.

pub mod favorites;
pub mod geocode;
pub mod http;
pub mod location;
pub mod provider;
pub mod types;

pub use favorites::{FavoritesStore, FileStore, KeyValueStore, MemoryStore, FAVORITES_KEY};
pub use geocode::LocationResolver;
pub use http::ApiSettings;
pub use location::{FixedLocation, LocationService, PositionError, PositionOptions};
pub use provider::WeatherProvider;
pub use types::*;
