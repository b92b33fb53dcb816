//! Device location seam.
//!
//! The platform capability is injected as a `LocationService`. A missing
//! capability means geolocation is unsupported and no request is issued.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{Coordinates, LocationError};

/// Platform error codes reported by a location service
pub mod codes {
    pub const PERMISSION_DENIED: u16 = 1;
    pub const POSITION_UNAVAILABLE: u16 = 2;
    pub const TIMEOUT: u16 = 3;
}

/// Options passed to a one-shot position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    /// Time allowed to acquire a fix
    pub timeout: Duration,
    /// Oldest cached fix that may be returned
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(15),
            maximum_age: Duration::from_secs(60),
        }
    }
}

/// Raw failure reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionError {
    pub code: u16,
    pub message: String,
}

impl PositionError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl LocationError {
    /// Map a platform error code; unknown codes are treated as a denial
    pub fn from_code(code: u16) -> Self {
        match code {
            codes::PERMISSION_DENIED => Self::PermissionDenied,
            codes::POSITION_UNAVAILABLE => Self::PositionUnavailable,
            codes::TIMEOUT => Self::Timeout,
            _ => Self::PermissionDenied,
        }
    }
}

impl From<PositionError> for LocationError {
    fn from(e: PositionError) -> Self {
        Self::from_code(e.code)
    }
}

/// A platform location capability
#[async_trait]
pub trait LocationService: Send + Sync {
    async fn current_position(&self, options: &PositionOptions)
        -> Result<Coordinates, PositionError>;
}

/// Location capability that always reports the same position
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coords: Coordinates,
}

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coords: Coordinates::new(latitude, longitude),
        }
    }
}

#[async_trait]
impl LocationService for FixedLocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, PositionError> {
        if !self.coords.is_valid() {
            return Err(PositionError::new(
                codes::POSITION_UNAVAILABLE,
                "configured coordinates are out of range",
            ));
        }
        Ok(self.coords)
    }
}

pub fn is_available(service: Option<&dyn LocationService>) -> bool {
    service.is_some()
}

/// Ask the platform for the device position.
///
/// The acquisition timeout is enforced here too, so a service that never
/// answers still ends in `LocationError::Timeout`.
pub async fn get_device_location(
    service: Option<&dyn LocationService>,
    options: &PositionOptions,
) -> Result<Coordinates, LocationError> {
    let Some(service) = service else {
        tracing::debug!("No location capability, geolocation unsupported");
        return Err(LocationError::Unsupported);
    };

    match tokio::time::timeout(options.timeout, service.current_position(options)).await {
        Ok(Ok(coords)) => {
            tracing::info!("Got location: {}, {}", coords.latitude, coords.longitude);
            Ok(coords)
        }
        Ok(Err(e)) => {
            tracing::warn!(code = e.code, "Location request failed: {}", e.message);
            Err(LocationError::from(e))
        }
        Err(_) => Err(LocationError::Timeout),
    }
}
