//! Weather provider: current conditions and forecast from OpenWeatherMap.

use std::sync::Arc;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::http::{fetch_json, ApiSettings};
use crate::types::{CurrentWeather, ForecastEntry, ForecastResponse, WeatherError};

/// Temperatures are always requested in Celsius
const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    settings: ApiSettings,
    /// Parent of every per-request token; cancelled on shutdown
    shutdown: CancellationToken,
}

impl WeatherProvider {
    pub fn with_client(client: Arc<Client>, settings: ApiSettings) -> Self {
        Self {
            client,
            settings,
            shutdown: CancellationToken::new(),
        }
    }

    /// Abort every request still in flight
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn city_params(city: &str) -> [(&'static str, String); 2] {
        [("q", city.to_string()), ("units", UNITS.to_string())]
    }

    /// Current conditions for `city`
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let url = self.settings.endpoint(
            &self.settings.weather_base_url,
            "weather",
            &Self::city_params(city),
        )?;
        fetch_json(
            &self.client,
            url,
            self.settings.request_timeout,
            self.shutdown.child_token(),
        )
        .await
    }

    /// 3-hourly forecast steps for `city`
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
        let url = self.settings.endpoint(
            &self.settings.weather_base_url,
            "forecast",
            &Self::city_params(city),
        )?;
        let response: ForecastResponse = fetch_json(
            &self.client,
            url,
            self.settings.request_timeout,
            self.shutdown.child_token(),
        )
        .await?;
        Ok(response.list)
    }

    /// Fetch current conditions and forecast concurrently.
    ///
    /// All-or-nothing: the first failure drops the other request and is returned.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current_and_forecast(
        &self,
        city: &str,
    ) -> Result<(CurrentWeather, Vec<ForecastEntry>), WeatherError> {
        let (current, forecast) =
            tokio::try_join!(self.fetch_current(city), self.fetch_forecast(city))?;

        tracing::info!(
            city = %current.name,
            forecast_steps = forecast.len(),
            "Weather fetched"
        );
        Ok((current, forecast))
    }
}
