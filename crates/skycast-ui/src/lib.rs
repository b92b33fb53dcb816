//! Headless front-end for Skycast: view state, input debouncing and the
//! controller that drives searches, geolocation and favorites.

pub mod controller;
pub mod debounce;
pub mod error_mapping;
pub mod models;
pub mod services;

pub use controller::{WeatherApp, WeatherAppOptions};
pub use error_mapping::IntoAppError;
pub use models::{CurrentPanel, ForecastCard, WeatherView};
pub use services::{WeatherServiceError, WeatherServiceMessage};
