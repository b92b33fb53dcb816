//! Weather backend: runs controller actions off the caller's task and reports
//! the resulting view over a channel.

use tokio::sync::mpsc::UnboundedSender;

use crate::controller::WeatherApp;
use crate::models::weather_model::WeatherView;

/// Error type for weather service requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherServiceError {
    /// Called outside a tokio runtime
    NotInitialized,
}

impl std::fmt::Display for WeatherServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherServiceError::NotInitialized => write!(f, "Weather service not initialized"),
        }
    }
}

impl std::error::Error for WeatherServiceError {}

/// Messages sent from async operations back to the front-end
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// A search (typed or favorite) finished, successfully or not
    SearchDone(Result<WeatherView, WeatherServiceError>),
    /// A geolocation search finished
    GeolocateDone(Result<WeatherView, WeatherServiceError>),
    /// Autocomplete settled for the latest input
    SuggestionsReady(Result<WeatherView, WeatherServiceError>),
}

fn runtime() -> Result<tokio::runtime::Handle, WeatherServiceError> {
    tokio::runtime::Handle::try_current().map_err(|_| WeatherServiceError::NotInitialized)
}

/// Submit `text` as a search. Sends `SearchDone` when complete.
pub fn request_search(tx: &UnboundedSender<WeatherServiceMessage>, app: &WeatherApp, text: &str) {
    let tx = tx.clone();
    let runtime = match runtime() {
        Ok(r) => r,
        Err(e) => {
            let _ = tx.send(WeatherServiceMessage::SearchDone(Err(e)));
            return;
        }
    };

    let app = app.clone();
    let text = text.to_string();
    runtime.spawn(async move {
        app.on_submit(&text).await;
        let _ = tx.send(WeatherServiceMessage::SearchDone(Ok(app.view())));
    });
}

/// Search for a saved favorite. Sends `SearchDone` when complete.
pub fn request_favorite(tx: &UnboundedSender<WeatherServiceMessage>, app: &WeatherApp, city: &str) {
    let tx = tx.clone();
    let runtime = match runtime() {
        Ok(r) => r,
        Err(e) => {
            let _ = tx.send(WeatherServiceMessage::SearchDone(Err(e)));
            return;
        }
    };

    let app = app.clone();
    let city = city.to_string();
    runtime.spawn(async move {
        app.select_favorite(&city).await;
        let _ = tx.send(WeatherServiceMessage::SearchDone(Ok(app.view())));
    });
}

/// Search for the device position. Sends `GeolocateDone` when complete.
pub fn request_geolocate(tx: &UnboundedSender<WeatherServiceMessage>, app: &WeatherApp) {
    let tx = tx.clone();
    let runtime = match runtime() {
        Ok(r) => r,
        Err(e) => {
            let _ = tx.send(WeatherServiceMessage::GeolocateDone(Err(e)));
            return;
        }
    };

    let app = app.clone();
    runtime.spawn(async move {
        app.on_geolocate().await;
        let _ = tx.send(WeatherServiceMessage::GeolocateDone(Ok(app.view())));
    });
}

/// Feed new input text to autocomplete.
/// Sends `SuggestionsReady` only if this input was not superseded by a later one.
pub fn request_suggestions(
    tx: &UnboundedSender<WeatherServiceMessage>,
    app: &WeatherApp,
    text: &str,
) {
    let tx = tx.clone();
    let runtime = match runtime() {
        Ok(r) => r,
        Err(e) => {
            let _ = tx.send(WeatherServiceMessage::SuggestionsReady(Err(e)));
            return;
        }
    };

    let pending = app.on_input_changed(text);
    let app = app.clone();
    runtime.spawn(async move {
        match pending.await {
            Ok(true) => {
                let _ = tx.send(WeatherServiceMessage::SuggestionsReady(Ok(app.view())));
            }
            Ok(false) => {}
            Err(e) => tracing::warn!("Autocomplete task failed: {}", e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use reqwest::Client;
    use skycast_core::UiState;
    use skycast_weather::{
        ApiSettings, FavoritesStore, LocationResolver, MemoryStore, WeatherProvider,
        FAVORITES_KEY,
    };
    use tokio::sync::mpsc::unbounded_channel;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::controller::WeatherAppOptions;

    fn app(server_uri: &str) -> WeatherApp {
        let settings = ApiSettings::new("test_key").with_base_url(server_uri);
        let client = Arc::new(Client::new());
        WeatherApp::new(
            LocationResolver::new(client.clone(), settings.clone()),
            WeatherProvider::with_client(client, settings),
            FavoritesStore::load(Arc::new(MemoryStore::new()), FAVORITES_KEY),
            None,
            WeatherAppOptions {
                debounce: Duration::from_millis(20),
                ..WeatherAppOptions::default()
            },
        )
    }

    #[test]
    fn weather_service_error_display() {
        assert!(format!("{}", WeatherServiceError::NotInitialized).contains("not initialized"));
    }

    #[test]
    fn request_outside_runtime_reports_not_initialized() {
        let (tx, mut rx) = unbounded_channel();
        let app = app("http://127.0.0.1:1");

        request_search(&tx, &app, "Paris");
        match rx.try_recv() {
            Ok(WeatherServiceMessage::SearchDone(Err(e))) => {
                assert_eq!(e, WeatherServiceError::NotInitialized)
            }
            other => panic!("expected NotInitialized, got {other:?}"),
        }

        request_geolocate(&tx, &app);
        assert!(matches!(
            rx.try_recv(),
            Ok(WeatherServiceMessage::GeolocateDone(Err(_)))
        ));
    }

    #[tokio::test]
    async fn request_search_sends_view() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let (tx, mut rx) = unbounded_channel();
        request_search(&tx, &app(&mock_server.uri()), "Paris");

        match rx.recv().await {
            Some(WeatherServiceMessage::SearchDone(Ok(view))) => {
                assert_eq!(view.state, UiState::Error);
                assert_eq!(view.error_message.as_deref(), Some("API Error 500: boom"));
            }
            other => panic!("expected SearchDone, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn request_geolocate_without_capability() {
        let (tx, mut rx) = unbounded_channel();
        request_geolocate(&tx, &app("http://127.0.0.1:1"));

        match rx.recv().await {
            Some(WeatherServiceMessage::GeolocateDone(Ok(view))) => {
                assert_eq!(view.error_message.as_deref(), Some("Geolocation not supported"));
            }
            other => panic!("expected GeolocateDone, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn request_suggestions_reports_only_latest_input() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Oslo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "Oslo", "lat": 59.91, "lon": 10.75, "country": "NO"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (tx, mut rx) = unbounded_channel();
        let app = app(&mock_server.uri());
        request_suggestions(&tx, &app, "Os");
        request_suggestions(&tx, &app, "Oslo");

        match rx.recv().await {
            Some(WeatherServiceMessage::SuggestionsReady(Ok(view))) => {
                assert_eq!(view.input, "Oslo");
                assert_eq!(view.suggestions, vec!["Oslo, NO"]);
            }
            other => panic!("expected SuggestionsReady, got {other:?}"),
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }
}
