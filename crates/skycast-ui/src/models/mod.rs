pub mod weather_model;

pub use weather_model::{
    format_temperature, render_current, render_forecast, CurrentPanel, ForecastCard, WeatherView,
};
