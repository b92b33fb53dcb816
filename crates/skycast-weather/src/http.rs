//! Time-bounded JSON GET shared by the geocoding and weather clients.
//!
//! Every call owns a cancellation token. When the time bound expires the token
//! is cancelled and the in-flight request future is dropped, which aborts the
//! underlying connection.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::types::{ResponseSchema, WeatherError};

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoints, credentials and time bound for the OpenWeatherMap collaborators
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub api_key: String,
    pub weather_base_url: String,
    pub geo_base_url: String,
    pub request_timeout: Duration,
}

impl ApiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            geo_base_url: DEFAULT_GEO_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Point both collaborators at one server (used against mock servers)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.weather_base_url = format!("{base}/data/2.5");
        self.geo_base_url = format!("{base}/geo/1.0");
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build `<base>/<path>?<params>&appid=<key>`
    pub(crate) fn endpoint(
        &self,
        base: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Url, WeatherError> {
        let raw = format!("{}/{}", base.trim_end_matches('/'), path);
        let mut url = Url::parse(&raw)
            .map_err(|e| WeatherError::Transport(format!("invalid endpoint {raw}: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("appid", &self.api_key);
        }
        Ok(url)
    }
}

/// GET `url` and decode a validated JSON body within `timeout`.
///
/// Non-2xx responses fail with the status and the body text verbatim.
pub(crate) async fn fetch_json<T>(
    client: &Client,
    url: Url,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<T, WeatherError>
where
    T: DeserializeOwned + ResponseSchema,
{
    let request = async {
        let response = client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let value: T =
            serde_json::from_slice(&bytes).map_err(|e| WeatherError::Parse(e.to_string()))?;
        value.validate().map_err(WeatherError::Parse)?;
        Ok(value)
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!(path = url.path(), "Request cancelled");
            Err(WeatherError::Cancelled)
        }
        _ = tokio::time::sleep(timeout) => {
            cancel.cancel();
            tracing::warn!(path = url.path(), ?timeout, "Request exceeded time bound, aborted");
            Err(WeatherError::Timeout)
        }
        result = request => result,
    }
}
