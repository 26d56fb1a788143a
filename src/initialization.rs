use std::env;
use std::sync::Arc;
use log::{info, warn};
use anyhow::Result;
use thiserror::Error;
use crate::config::{load_config, Config, LoadConfigurationError};
use crate::logging::{setup_logger, LoggerError};
use crate::manager_forecast::Forecast;
use crate::manager_forecast::errors::ForecastError;
use crate::routes::AppState;

/// Initializes and returns configuration and the state shared by all requests
///
pub fn init() -> Result<(Config, AppState), InitializationError> {
    let args: Vec<String> = env::args().collect();
    let config_path = args.iter()
        .find_map(|p| p.strip_prefix("--config="));

    // Load configuration
    let config = load_config(config_path)?;

    // Setup logging
    let _ = setup_logger(config.general.log_path.as_deref(), config.general.log_level, config.general.log_to_stdout)?;

    // Print version
    info!("starting weather proxy version: {}", env!("CARGO_PKG_VERSION"));

    if config.cwa.api_key.is_none() {
        warn!("CWA_API_KEY is not set, weather requests will fail until it is configured");
    }

    let forecast = Forecast::new(&config.cwa)?;
    let state = AppState::new(&config, Arc::new(forecast));

    Ok((config, state))
}

/// Error depicting errors that occur while initializing the proxy
///
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] LoadConfigurationError),
    #[error("SetupLoggerError: {0}")]
    SetupLoggerError(#[from] LoggerError),
    #[error("ForecastSetupError: {0}")]
    ForecastSetupError(#[from] ForecastError),
}
