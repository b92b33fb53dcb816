pub mod app;
pub mod config;
pub mod error;
pub mod ui_state;

pub use app::App;
pub use config::{
    ApiConfig, Config, FavoritesConfig, LocationConfig, SearchConfig, ValidationResult,
};
pub use error::{AppError, LocationError, NetworkError};
pub use ui_state::UiState;

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Skycast core initialized");
    Ok(())
}
