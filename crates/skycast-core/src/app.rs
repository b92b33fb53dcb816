use anyhow::Result;
use std::sync::Arc;

use crate::{Config, ValidationResult};

/// Main application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
    validation: ValidationResult,
}

impl App {
    /// Create a new application instance from the on-disk configuration
    pub fn new() -> Result<Self> {
        let (config, validation) = Config::load_validated()?;
        Ok(Self::from_parts(config, validation))
    }

    /// Create an application instance from an already loaded configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let validation = config.validate();
        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }
        Ok(Self::from_parts(config, validation))
    }

    fn from_parts(config: Config, validation: ValidationResult) -> Self {
        tracing::info!(
            config_dir = %config.config_dir.display(),
            warnings = validation.warnings.len(),
            "Application configured"
        );
        Self {
            config: Arc::new(config),
            validation,
        }
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the application config
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    /// Warnings produced while validating the config
    pub fn warnings(&self) -> &[crate::config::ConfigValidationError] {
        &self.validation.warnings
    }
}
