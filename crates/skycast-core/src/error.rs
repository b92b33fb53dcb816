//! Centralized error types for the Skycast application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-facing messages for the error display region
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Every failure that reaches the view goes through this type.
/// Use `user_message()` to get the text shown in the error region.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Empty search input")]
    EmptyInput,

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns the message displayed in the UI error region.
    pub fn user_message(&self) -> String {
        match self {
            AppError::EmptyInput => "Please enter a city name".to_string(),
            AppError::Network(e) => e.user_message(),
            AppError::Location(e) => e.user_message().to_string(),
            AppError::Other(_) => "Failed to fetch weather data".to_string(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API Error {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection.".to_string()
            }
            NetworkError::Timeout => "The request timed out. Please try again.".to_string(),
            // Status and body are shown verbatim for diagnosis
            NetworkError::ApiStatus { .. } => self.to_string(),
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response from the weather service.".to_string()
            }
        }
    }
}

/// Location errors (device position and reverse geocoding).
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,

    #[error("Geolocation not supported")]
    Unsupported,

    #[error("No place found for coordinates")]
    Unresolved,

    #[error("Location service failed: {0}")]
    ServiceFailed(String),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => "Location access denied",
            LocationError::PositionUnavailable => "Location unavailable",
            LocationError::Timeout => "Location request timeout",
            LocationError::Unsupported => "Geolocation not supported",
            LocationError::Unresolved => "Could not determine your location",
            LocationError::ServiceFailed(_) => "Location service unavailable",
        }
    }
}
