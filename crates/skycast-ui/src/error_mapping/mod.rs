//! Maps weather-crate errors to skycast_core::AppError for consistent user-facing messages.
//!
//! Both sides are foreign to this crate, so the mapping is an extension trait
//! rather than `From` impls.

use skycast_core::{AppError, LocationError, NetworkError};
use skycast_weather::{LocationError as DeviceLocationError, WeatherError};

pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}

impl IntoAppError for WeatherError {
    fn into_app_error(self) -> AppError {
        match self {
            WeatherError::Transport(s) => AppError::Network(NetworkError::ConnectionFailed(s)),
            WeatherError::Timeout => AppError::Network(NetworkError::Timeout),
            WeatherError::Cancelled => AppError::Other(anyhow::anyhow!("request cancelled")),
            WeatherError::ApiStatus { status, body } => {
                AppError::Network(NetworkError::ApiStatus { status, body })
            }
            WeatherError::Parse(s) => AppError::Network(NetworkError::InvalidResponse(s)),
            WeatherError::LocationUnresolved => AppError::Location(LocationError::Unresolved),
            WeatherError::LocationService(s) => {
                AppError::Location(LocationError::ServiceFailed(s))
            }
            WeatherError::Location(e) => e.into_app_error(),
        }
    }
}

impl IntoAppError for DeviceLocationError {
    fn into_app_error(self) -> AppError {
        AppError::Location(match self {
            DeviceLocationError::PermissionDenied => LocationError::PermissionDenied,
            DeviceLocationError::PositionUnavailable => LocationError::PositionUnavailable,
            DeviceLocationError::Timeout => LocationError::Timeout,
            DeviceLocationError::Unsupported => LocationError::Unsupported,
        })
    }
}
