pub mod weather_service;

pub use weather_service::{
    request_favorite, request_geolocate, request_search, request_suggestions,
    WeatherServiceError, WeatherServiceMessage,
};
