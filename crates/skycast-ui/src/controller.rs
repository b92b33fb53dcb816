//! Weather screen controller: wires input, search, geolocation and favorites
//! to the shared `WeatherView`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::instrument;

use skycast_core::{AppError, Config};
use skycast_weather::location::{self, get_device_location};
use skycast_weather::{
    ApiSettings, CurrentWeather, FavoritesStore, ForecastEntry, KeyValueStore, LocationResolver,
    LocationService, PositionOptions, SearchQuery, WeatherError, WeatherProvider,
};

use crate::debounce::Debouncer;
use crate::error_mapping::IntoAppError;
use crate::models::weather_model::{render_current, render_forecast, WeatherView};

/// Input handling knobs
#[derive(Debug, Clone)]
pub struct WeatherAppOptions {
    /// Quiet period before autocomplete fires
    pub debounce: Duration,
    /// Shortest trimmed input that triggers autocomplete
    pub min_query_len: usize,
    pub position: PositionOptions,
}

impl Default for WeatherAppOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_len: 2,
            position: PositionOptions::default(),
        }
    }
}

impl From<&Config> for WeatherAppOptions {
    fn from(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.search.debounce_ms),
            min_query_len: config.search.min_query_len,
            position: PositionOptions {
                high_accuracy: config.location.high_accuracy,
                timeout: Duration::from_secs(config.location.timeout_secs),
                maximum_age: Duration::from_secs(config.location.maximum_age_secs),
            },
        }
    }
}

struct Inner {
    resolver: LocationResolver,
    provider: WeatherProvider,
    location: Option<Arc<dyn LocationService>>,
    options: WeatherAppOptions,
    debouncer: Debouncer,
    /// Bumped by every search start; completions from older generations are dropped
    generation: AtomicU64,
    // Lock order: view before favorites
    view: Mutex<WeatherView>,
    favorites: Mutex<FavoritesStore>,
}

/// Cheap to clone; every clone drives the same view.
#[derive(Clone)]
pub struct WeatherApp {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for WeatherApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApp")
            .field("generation", &self.inner.generation.load(Ordering::SeqCst))
            .field("view", &*self.inner.view.lock())
            .finish()
    }
}

impl WeatherApp {
    pub fn new(
        resolver: LocationResolver,
        provider: WeatherProvider,
        favorites: FavoritesStore,
        location: Option<Arc<dyn LocationService>>,
        options: WeatherAppOptions,
    ) -> Self {
        let view = WeatherView {
            favorites: favorites.list().to_vec(),
            ..WeatherView::default()
        };

        Self {
            inner: Arc::new(Inner {
                resolver,
                provider,
                location,
                debouncer: Debouncer::new(options.debounce),
                options,
                generation: AtomicU64::new(0),
                view: Mutex::new(view),
                favorites: Mutex::new(favorites),
            }),
        }
    }

    /// Build every collaborator from the loaded configuration
    pub fn from_config(
        config: &Config,
        client: Arc<Client>,
        store: Arc<dyn KeyValueStore>,
        location: Option<Arc<dyn LocationService>>,
    ) -> Self {
        let settings = ApiSettings {
            api_key: config.api.api_key.clone(),
            weather_base_url: config.api.weather_base_url.clone(),
            geo_base_url: config.api.geo_base_url.clone(),
            request_timeout: Duration::from_secs(config.api.request_timeout_secs),
        };
        let resolver = LocationResolver::new(client.clone(), settings.clone())
            .with_suggestion_limit(config.search.suggestion_limit);
        let provider = WeatherProvider::with_client(client, settings);
        let favorites = FavoritesStore::load(store, config.favorites.storage_key.clone());

        Self::new(
            resolver,
            provider,
            favorites,
            location,
            WeatherAppOptions::from(config),
        )
    }

    /// Snapshot of the current view
    pub fn view(&self) -> WeatherView {
        self.inner.view.lock().clone()
    }

    pub fn has_location(&self) -> bool {
        location::is_available(self.inner.location.as_deref())
    }

    /// Record new input text and schedule a debounced autocomplete lookup.
    ///
    /// Input shorter than the minimum clears the suggestions without a request.
    /// The handle resolves to `false` when a later keystroke superseded this one.
    pub fn on_input_changed(&self, text: &str) -> JoinHandle<bool> {
        self.inner.view.lock().input = text.to_string();

        let inner = Arc::clone(&self.inner);
        let query = text.trim().to_string();
        self.inner.debouncer.call(async move {
            if query.chars().count() < inner.options.min_query_len {
                inner.view.lock().suggestions.clear();
                return;
            }

            let suggestions = inner.resolver.suggest_cities(&query).await;
            tracing::debug!(query = %query, count = suggestions.len(), "Suggestions ready");
            inner.view.lock().suggestions = suggestions.iter().map(|s| s.label()).collect();
        })
    }

    /// Explicit submission of the input text
    pub async fn on_submit(&self, text: &str) {
        let city = text.trim();
        if city.is_empty() {
            self.supersede(AppError::EmptyInput);
            return;
        }
        self.search(city).await;
    }

    /// Fetch and show weather for `city`
    pub async fn search(&self, city: &str) {
        self.lookup(SearchQuery::City(city.to_string())).await;
    }

    /// Fetch and show weather for a city name or a position
    #[instrument(skip(self), level = "info")]
    pub async fn lookup(&self, query: SearchQuery) {
        let generation = self.begin();
        self.run(generation, query).await;
    }

    /// Run a search for a saved favorite
    pub async fn select_favorite(&self, city: &str) {
        self.search(city).await;
    }

    /// Locate the device, resolve the nearest city and search for it
    #[instrument(skip(self), level = "info")]
    pub async fn on_geolocate(&self) {
        let Some(service) = self.inner.location.clone() else {
            tracing::warn!("Geolocation requested without a location capability");
            self.supersede(AppError::from(skycast_core::LocationError::Unsupported));
            return;
        };

        let generation = self.begin();

        let coords =
            match get_device_location(Some(service.as_ref()), &self.inner.options.position).await {
                Ok(coords) => coords,
                Err(e) => {
                    self.fail(generation, e.into_app_error());
                    return;
                }
            };

        self.run(generation, SearchQuery::Position(coords)).await;
    }

    /// Forget every favorite, on disk and on screen
    pub fn clear_favorites(&self) {
        let mut view = self.inner.view.lock();
        if let Err(e) = self.inner.favorites.lock().clear() {
            tracing::warn!("Failed to persist cleared favorites: {}", e);
        }
        view.favorites.clear();
        tracing::info!("Favorites cleared");
    }

    /// Cancel pending autocomplete and in-flight weather requests
    pub fn shutdown(&self) {
        self.inner.debouncer.cancel();
        self.inner.provider.shutdown();
    }

    async fn run(&self, generation: u64, query: SearchQuery) {
        let city = match query {
            SearchQuery::City(city) => city,
            SearchQuery::Position(coords) => match self
                .inner
                .resolver
                .resolve_from_coordinates(coords.latitude, coords.longitude)
                .await
            {
                Ok(city) => city,
                Err(e) => {
                    self.fail(generation, e.into_app_error());
                    return;
                }
            },
        };

        let result = self.inner.provider.fetch_current_and_forecast(&city).await;
        self.finish(generation, &city, result);
    }

    fn begin(&self) -> u64 {
        self.inner.debouncer.cancel();
        let mut view = self.inner.view.lock();
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        view.begin_loading();
        view.suggestions.clear();
        generation
    }

    /// Show an error raised before any request, retiring searches still in flight
    fn supersede(&self, error: AppError) {
        let mut view = self.inner.view.lock();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Showing error: {}", error);
        view.show_error(error.user_message());
    }

    fn fail(&self, generation: u64, error: AppError) {
        let mut view = self.inner.view.lock();
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Dropping failure of a superseded search");
            return;
        }
        tracing::warn!("Weather request failed: {}", error);
        view.show_error(error.user_message());
    }

    fn finish(
        &self,
        generation: u64,
        city: &str,
        result: Result<(CurrentWeather, Vec<ForecastEntry>), WeatherError>,
    ) {
        let (current, forecast) = match result {
            Ok(data) => data,
            Err(e) => {
                self.fail(generation, e.into_app_error());
                return;
            }
        };

        let mut view = self.inner.view.lock();
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, city, "Dropping result of a superseded search");
            return;
        }

        let panel = render_current(&current);
        let cards = render_forecast(&forecast, current.timezone);
        view.show_results(panel, cards);
        view.input = city.to_string();

        let mut favorites = self.inner.favorites.lock();
        match favorites.record(city) {
            Ok(true) => tracing::info!(city, "Added favorite"),
            Ok(false) => {}
            Err(e) => tracing::warn!(city, "Failed to persist favorites: {}", e),
        }
        view.favorites = favorites.list().to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use skycast_core::UiState;
    use skycast_weather::location::codes;
    use skycast_weather::{Coordinates, FixedLocation, MemoryStore, PositionError, FAVORITES_KEY};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn current_body(city: &str) -> serde_json::Value {
        serde_json::json!({
            "name": city,
            "dt": 1_700_000_000,
            "timezone": 0,
            "sys": {"country": "FR"},
            "main": {"temp": 12.6, "feels_like": 11.2, "humidity": 81},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "wind": {"speed": 3.6}
        })
    }

    fn forecast_body() -> serde_json::Value {
        serde_json::json!({
            "list": [
                {"dt": 1_700_049_600, "main": {"temp": 11.0, "feels_like": 10.0, "humidity": 80},
                 "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
                 "pop": 0.2}
            ]
        })
    }

    async fn mount_city(server: &MockServer, city: &str, delay: Duration) {
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", city))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(current_body(city))
                    .set_delay(delay),
            )
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .and(query_param("q", city))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(forecast_body())
                    .set_delay(delay),
            )
            .mount(server)
            .await;
    }

    fn build(
        server: &MockServer,
        store: Arc<dyn KeyValueStore>,
        location: Option<Arc<dyn LocationService>>,
        timeout: Duration,
    ) -> WeatherApp {
        let settings = ApiSettings::new("test_key")
            .with_base_url(&server.uri())
            .with_timeout(timeout);
        let client = Arc::new(Client::new());
        WeatherApp::new(
            LocationResolver::new(client.clone(), settings.clone()),
            WeatherProvider::with_client(client, settings),
            FavoritesStore::load(store, FAVORITES_KEY),
            location,
            WeatherAppOptions {
                debounce: Duration::from_millis(50),
                ..WeatherAppOptions::default()
            },
        )
    }

    fn app(server: &MockServer) -> WeatherApp {
        build(server, Arc::new(MemoryStore::new()), None, Duration::from_secs(5))
    }

    struct FailingLocation(u16);

    #[async_trait]
    impl LocationService for FailingLocation {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinates, PositionError> {
            Err(PositionError::new(self.0, "platform failure"))
        }
    }

    #[tokio::test]
    async fn test_short_input_clears_suggestions_without_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Lon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "London", "lat": 51.5, "lon": -0.12, "country": "GB", "state": "England"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&mock_server)
            .await;

        let app = app(&mock_server);
        assert!(app.on_input_changed("Lon").await.unwrap());
        assert_eq!(app.view().suggestions, vec!["London, England"]);

        assert!(app.on_input_changed(" L ").await.unwrap());
        let view = app.view();
        assert!(view.suggestions.is_empty());
        assert_eq!(view.input, " L ");
    }

    #[tokio::test]
    async fn test_rapid_input_issues_one_request_for_last_value() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "Paris", "lat": 48.85, "lon": 2.35, "country": "FR", "state": "Ile-de-France"},
                {"name": "Paris", "lat": 33.66, "lon": -95.55, "country": "US", "state": "Texas"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&mock_server)
            .await;

        let app = app(&mock_server);
        let handles: Vec<_> = ["Pa", "Par", "Pari", "Paris"]
            .into_iter()
            .map(|text| app.on_input_changed(text))
            .collect();

        let mut fired = Vec::new();
        for handle in handles {
            fired.push(handle.await.unwrap());
        }

        assert_eq!(fired, vec![false, false, false, true]);
        assert_eq!(
            app.view().suggestions,
            vec!["Paris, Ile-de-France", "Paris, Texas"]
        );
    }

    #[tokio::test]
    async fn test_search_renders_and_records_favorite_once() {
        let mock_server = MockServer::start().await;
        mount_city(&mock_server, "Paris", Duration::ZERO).await;

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let app = build(&mock_server, store.clone(), None, Duration::from_secs(5));

        app.on_submit("  Paris ").await;
        app.search("Paris").await;

        let view = app.view();
        assert_eq!(view.state, UiState::Idle);
        assert_eq!(view.input, "Paris");
        assert!(view.error_message.is_none());
        let current = view.current.unwrap();
        assert_eq!(current.location, "Paris, FR");
        assert_eq!(current.temperature, "13°C");
        assert_eq!(view.forecast.len(), 1);
        assert_eq!(view.favorites, vec!["Paris"]);

        let reloaded = FavoritesStore::load(store, FAVORITES_KEY);
        assert_eq!(reloaded.list(), ["Paris"]);
    }

    #[tokio::test]
    async fn test_empty_submit_shows_error_without_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let app = app(&mock_server);
        app.on_submit("   ").await;

        let view = app.view();
        assert_eq!(view.state, UiState::Error);
        assert_eq!(view.error_message.as_deref(), Some("Please enter a city name"));
    }

    #[tokio::test]
    async fn test_forecast_timeout_shows_error_and_no_panels() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Paris")))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(forecast_body())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let app = build(
            &mock_server,
            Arc::new(MemoryStore::new()),
            None,
            Duration::from_millis(200),
        );
        app.search("Paris").await;

        let view = app.view();
        assert_eq!(view.state, UiState::Error);
        assert_eq!(
            view.error_message.as_deref(),
            Some("The request timed out. Please try again.")
        );
        assert!(view.current.is_none());
        assert!(view.forecast.is_empty());
        assert!(view.favorites.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_shows_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_string("city not found"))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(404).set_body_string("city not found"))
            .mount(&mock_server)
            .await;

        let app = app(&mock_server);
        app.search("Atlantis").await;

        assert_eq!(
            app.view().error_message.as_deref(),
            Some("API Error 404: city not found")
        );
    }

    #[tokio::test]
    async fn test_stale_search_is_discarded() {
        let mock_server = MockServer::start().await;
        mount_city(&mock_server, "Slow", Duration::from_millis(500)).await;
        mount_city(&mock_server, "Fast", Duration::ZERO).await;

        let app = app(&mock_server);
        let slow = {
            let app = app.clone();
            tokio::spawn(async move { app.search("Slow").await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        app.search("Fast").await;
        slow.await.unwrap();

        let view = app.view();
        assert_eq!(view.input, "Fast");
        assert_eq!(view.current.unwrap().location, "Fast, FR");
        assert_eq!(view.favorites, vec!["Fast"]);
    }

    #[tokio::test]
    async fn test_empty_submit_retires_in_flight_search() {
        let mock_server = MockServer::start().await;
        mount_city(&mock_server, "Slow", Duration::from_millis(400)).await;

        let app = app(&mock_server);
        let slow = {
            let app = app.clone();
            tokio::spawn(async move { app.search("Slow").await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        app.on_submit("   ").await;
        slow.await.unwrap();

        let view = app.view();
        assert_eq!(view.state, UiState::Error);
        assert_eq!(view.error_message.as_deref(), Some("Please enter a city name"));
        assert!(view.current.is_none());
        assert!(view.favorites.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_geolocation_retires_in_flight_search() {
        let mock_server = MockServer::start().await;
        mount_city(&mock_server, "Slow", Duration::from_millis(400)).await;

        let app = app(&mock_server);
        let slow = {
            let app = app.clone();
            tokio::spawn(async move { app.search("Slow").await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        app.on_geolocate().await;
        slow.await.unwrap();

        let view = app.view();
        assert_eq!(view.error_message.as_deref(), Some("Geolocation not supported"));
        assert!(view.current.is_none());
        assert!(view.favorites.is_empty());
    }

    #[tokio::test]
    async fn test_search_drops_running_autocomplete() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([
                        {"name": "Rome", "lat": 41.9, "lon": 12.5, "country": "IT"}
                    ]))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&mock_server)
            .await;
        mount_city(&mock_server, "Paris", Duration::ZERO).await;

        let app = app(&mock_server);
        let pending = app.on_input_changed("Rome");

        // Past the quiet period, the lookup is waiting on the server
        tokio::time::sleep(Duration::from_millis(120)).await;
        app.search("Paris").await;

        assert!(!pending.await.unwrap());
        let view = app.view();
        assert!(view.suggestions.is_empty());
        assert_eq!(view.input, "Paris");
    }

    #[tokio::test]
    async fn test_clear_favorites_survives_reload() {
        let mock_server = MockServer::start().await;
        mount_city(&mock_server, "Paris", Duration::ZERO).await;
        mount_city(&mock_server, "Rome", Duration::ZERO).await;

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let app = build(&mock_server, store.clone(), None, Duration::from_secs(5));
        app.search("Paris").await;
        app.select_favorite("Rome").await;
        assert_eq!(app.view().favorites, vec!["Paris", "Rome"]);

        app.clear_favorites();
        assert!(app.view().favorites.is_empty());

        let reloaded = build(&mock_server, store, None, Duration::from_secs(5));
        assert!(reloaded.view().favorites.is_empty());
    }

    #[tokio::test]
    async fn test_geolocate_without_capability() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let app = app(&mock_server);
        assert!(!app.has_location());
        app.on_geolocate().await;

        let view = app.view();
        assert!(!view.is_loading());
        assert_eq!(view.error_message.as_deref(), Some("Geolocation not supported"));
    }

    #[tokio::test]
    async fn test_geolocate_error_messages() {
        let mock_server = MockServer::start().await;
        let cases = [
            (codes::PERMISSION_DENIED, "Location access denied"),
            (codes::POSITION_UNAVAILABLE, "Location unavailable"),
            (codes::TIMEOUT, "Location request timeout"),
            (42, "Location access denied"),
        ];

        for (code, expected) in cases {
            let app = build(
                &mock_server,
                Arc::new(MemoryStore::new()),
                Some(Arc::new(FailingLocation(code))),
                Duration::from_secs(5),
            );
            app.on_geolocate().await;

            let view = app.view();
            assert_eq!(view.state, UiState::Error);
            assert_eq!(view.error_message.as_deref(), Some(expected), "code {code}");
        }
    }

    #[tokio::test]
    async fn test_geolocate_searches_resolved_city() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/reverse"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "Paris", "lat": 48.85, "lon": 2.35, "country": "FR"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;
        mount_city(&mock_server, "Paris", Duration::ZERO).await;

        let app = build(
            &mock_server,
            Arc::new(MemoryStore::new()),
            Some(Arc::new(FixedLocation::new(48.85, 2.35))),
            Duration::from_secs(5),
        );
        app.on_geolocate().await;

        let view = app.view();
        assert_eq!(view.state, UiState::Idle);
        assert_eq!(view.input, "Paris");
        assert_eq!(view.favorites, vec!["Paris"]);
    }

    #[tokio::test]
    async fn test_lookup_by_position() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/reverse"))
            .and(query_param("lat", "41.9"))
            .and(query_param("lon", "12.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "Rome", "lat": 41.9, "lon": 12.5, "country": "IT"}
            ])))
            .mount(&mock_server)
            .await;
        mount_city(&mock_server, "Rome", Duration::ZERO).await;

        let app = app(&mock_server);
        app.lookup(SearchQuery::Position(Coordinates::new(41.9, 12.5)))
            .await;

        let view = app.view();
        assert_eq!(view.input, "Rome");
        assert_eq!(view.current.unwrap().location, "Rome, FR");
    }

    #[tokio::test]
    async fn test_geolocate_unresolved_position() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let app = build(
            &mock_server,
            Arc::new(MemoryStore::new()),
            Some(Arc::new(FixedLocation::new(0.0, 0.0))),
            Duration::from_secs(5),
        );
        app.on_geolocate().await;

        assert_eq!(
            app.view().error_message.as_deref(),
            Some("Could not determine your location")
        );
    }
}
