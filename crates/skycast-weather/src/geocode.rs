//! Geocoding: city autocomplete and coordinate-to-city resolution.
//! Uses the OpenWeatherMap geocoding API (`/direct` and `/reverse`).

use std::sync::Arc;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::http::{fetch_json, ApiSettings};
use crate::types::{CitySuggestion, Coordinates, GeoPlace, WeatherError};

/// Result cap for autocomplete queries
pub const SUGGESTION_LIMIT: u8 = 5;
/// Result cap for reverse lookups
const REVERSE_LIMIT: u8 = 1;

#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: Arc<Client>,
    settings: ApiSettings,
    suggestion_limit: u8,
}

impl LocationResolver {
    pub fn new(client: Arc<Client>, settings: ApiSettings) -> Self {
        Self {
            client,
            settings,
            suggestion_limit: SUGGESTION_LIMIT,
        }
    }

    pub fn with_suggestion_limit(mut self, limit: u8) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// Suggest up to five cities matching `query`.
    ///
    /// Best-effort: any failure is logged and yields an empty list.
    #[instrument(skip(self), level = "debug")]
    pub async fn suggest_cities(&self, query: &str) -> Vec<CitySuggestion> {
        match self.direct_lookup(query).await {
            Ok(places) => places.into_iter().map(CitySuggestion::from).collect(),
            Err(e) => {
                tracing::debug!("Autocomplete lookup failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn direct_lookup(&self, query: &str) -> Result<Vec<GeoPlace>, WeatherError> {
        let url = self.settings.endpoint(
            &self.settings.geo_base_url,
            "direct",
            &[
                ("q", query.to_string()),
                ("limit", self.suggestion_limit.to_string()),
            ],
        )?;
        fetch_json(
            &self.client,
            url,
            self.settings.request_timeout,
            CancellationToken::new(),
        )
        .await
    }

    /// Resolve a device position to the name of the nearest city.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve_from_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, WeatherError> {
        let coords = Coordinates::new(latitude, longitude);
        if !coords.is_valid() {
            return Err(WeatherError::LocationService(format!(
                "coordinates out of range: {latitude}, {longitude}"
            )));
        }

        let url = self.settings.endpoint(
            &self.settings.geo_base_url,
            "reverse",
            &[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("limit", REVERSE_LIMIT.to_string()),
            ],
        )?;

        let places: Vec<GeoPlace> = fetch_json(
            &self.client,
            url,
            self.settings.request_timeout,
            CancellationToken::new(),
        )
        .await
        .map_err(|e| {
            tracing::warn!("Reverse geocode failed: {}", e);
            WeatherError::LocationService(e.to_string())
        })?;

        match places.into_iter().next() {
            Some(place) => {
                tracing::info!("Reverse geocoded to: {}", place.name);
                Ok(place.name)
            }
            None => Err(WeatherError::LocationUnresolved),
        }
    }
}
