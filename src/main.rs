use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::unbounded_channel;

use skycast_core::App;
use skycast_ui::services::{
    request_favorite, request_geolocate, request_search, request_suggestions,
};
use skycast_ui::{WeatherApp, WeatherServiceMessage, WeatherView};
use skycast_weather::{FileStore, FixedLocation, KeyValueStore, LocationService};

const HELP: &str = "\
Commands:
  search <city>   fetch current weather and forecast
  type <text>     update the search box and show suggestions
  geo             search for your configured location
  fav <n>         search for favorite number n
  favorites       list saved favorites
  clear           forget all favorites
  help            show this help
  quit            exit";

fn print_view(view: &WeatherView) {
    if view.is_loading() {
        println!("Loading...");
        return;
    }
    if let Some(message) = &view.error_message {
        println!("Error: {message}");
    }
    if let Some(current) = &view.current {
        println!();
        println!("{} {}", current.icon, current.location);
        println!(
            "  {}  {} (feels like {})",
            current.temperature, current.description, current.feels_like
        );
        println!("  Humidity {}  Wind {}", current.humidity, current.wind);
        if let Some(observed) = &current.observed_at {
            println!("  Observed at {observed}");
        }
    }
    if !view.forecast.is_empty() {
        println!();
        for card in &view.forecast {
            let rain = card.precipitation.as_deref().unwrap_or("-");
            println!(
                "  {} {}  {:>5} / {:<5} {} (rain {})",
                card.day, card.icon, card.high, card.low, card.description, rain
            );
        }
    }
    println!();
}

fn print_suggestions(view: &WeatherView) {
    if view.suggestions.is_empty() {
        println!("No suggestions for \"{}\"", view.input);
        return;
    }
    for suggestion in &view.suggestions {
        println!("  > {suggestion}");
    }
}

fn print_favorites(favorites: &[String]) {
    if favorites.is_empty() {
        println!("No favorites yet");
        return;
    }
    for (i, city) in favorites.iter().enumerate() {
        println!("  {}. {}", i + 1, city);
    }
}

/// Returns false when the user asked to quit
fn handle_command(
    line: &str,
    weather: &WeatherApp,
    tx: &tokio::sync::mpsc::UnboundedSender<WeatherServiceMessage>,
) -> bool {
    let line = line.trim();
    let (command, arg) = line.split_once(' ').unwrap_or((line, ""));

    match command {
        "" => {}
        "search" => request_search(tx, weather, arg),
        "type" => request_suggestions(tx, weather, arg),
        "geo" => request_geolocate(tx, weather),
        "fav" => {
            let favorites = weather.view().favorites;
            match arg.trim().parse::<usize>() {
                Ok(n) if (1..=favorites.len()).contains(&n) => {
                    request_favorite(tx, weather, &favorites[n - 1]);
                }
                _ => println!("Pick a favorite between 1 and {}", favorites.len()),
            }
        }
        "favorites" => print_favorites(&weather.view().favorites),
        "clear" => {
            weather.clear_favorites();
            println!("Favorites cleared");
        }
        "help" => println!("{HELP}"),
        "quit" | "exit" => return false,
        other => println!("Unknown command: {other} (try 'help')"),
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    skycast_core::init()?;

    // Create application from the on-disk configuration
    let mut app = App::new()?;
    for warning in app.warnings() {
        tracing::warn!("Config: {}", warning);
    }
    let config = app.shared_config();

    let client = Arc::new(
        reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?,
    );
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.favorites_path()));
    let location: Option<Arc<dyn LocationService>> = config
        .location
        .coordinates()
        .map(|(lat, lon)| Arc::new(FixedLocation::new(lat, lon)) as Arc<dyn LocationService>);

    let weather = WeatherApp::from_config(&config, client, store, location);

    tracing::info!("Skycast started");
    println!("Skycast - weather in your terminal");
    println!("  Config directory: {}", config.config_dir.display());
    if !config.api.is_configured() {
        println!("  No API key set. Add one to the config file or set SKYCAST_API_KEY.");
    }
    if !weather.has_location() {
        println!("  Location disabled. Set [location] in the config to enable 'geo'.");
    }
    println!("\n{HELP}\n");

    let (tx, mut rx) = unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read from stdin")? {
                    Some(line) => {
                        if !handle_command(&line, &weather, &tx) {
                            break;
                        }
                    }
                    None => break,
                }
            }
            Some(message) = rx.recv() => match message {
                WeatherServiceMessage::SearchDone(Ok(view))
                | WeatherServiceMessage::GeolocateDone(Ok(view)) => print_view(&view),
                WeatherServiceMessage::SuggestionsReady(Ok(view)) => print_suggestions(&view),
                WeatherServiceMessage::SearchDone(Err(e))
                | WeatherServiceMessage::GeolocateDone(Err(e))
                | WeatherServiceMessage::SuggestionsReady(Err(e)) => {
                    tracing::error!("Weather service error: {}", e);
                }
            },
        }
    }

    // Graceful shutdown
    weather.shutdown();
    app.shutdown()?;

    Ok(())
}
