use std::env;
use std::fs;
use std::net::IpAddr;
use std::str::FromStr;
use log::LevelFilter;
use serde::Deserialize;
use anyhow::Result;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://opendata.cwa.gov.tw/api/v1/rest/datastore";
const DEFAULT_DATASET: &str = "F-C0032-001";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Server {
    pub bind_address: IpAddr,
    pub port: u16,
    pub cors: bool,
}

impl Default for Server {
    fn default() -> Self {
        Server {
            bind_address: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            cors: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Cwa {
    pub base_url: String,
    pub dataset: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Cwa {
    fn default() -> Self {
        Cwa {
            base_url: DEFAULT_BASE_URL.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct General {
    pub log_path: Option<String>,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

impl Default for General {
    fn default() -> Self {
        General {
            log_path: None,
            log_level: LevelFilter::Info,
            log_to_stdout: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: Server,
    pub cwa: Cwa,
    pub general: General,
}

/// Loads the configuration and returns a struct with all configuration items
///
/// The configuration file is optional, every item has a default. Environment variables
/// are applied on top of whatever the file says.
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file, if any
pub fn load_config(config_path: Option<&str>) -> Result<Config, LoadConfigurationError> {
    let mut config: Config = match config_path {
        Some(path) => {
            let toml = fs::read_to_string(path)?;
            toml::from_str(&toml)?
        }
        None => Config::default(),
    };

    apply_env(&mut config, |key| env::var(key).ok())?;

    Ok(config)
}

/// Overrides configuration items with values from the environment
///
/// # Arguments
///
/// * 'config' - configuration to update
/// * 'var' - lookup function for environment variables
fn apply_env(config: &mut Config, var: impl Fn(&str) -> Option<String>) -> Result<(), LoadConfigurationError> {
    if let Some(port) = var("PORT") {
        config.server.port = port.trim().parse::<u16>()
            .map_err(|e| LoadConfigurationError::InvalidValue(format!("PORT '{}': {}", port, e)))?;
    }

    if let Some(api_key) = var("CWA_API_KEY") {
        let api_key = api_key.trim();
        config.cwa.api_key = if api_key.is_empty() { None } else { Some(api_key.to_string()) };
    }

    if let Some(base_url) = var("CWA_BASE_URL") {
        config.cwa.base_url = base_url;
    }

    if let Some(level) = var("LOG_LEVEL") {
        config.general.log_level = LevelFilter::from_str(level.trim())
            .map_err(|e| LoadConfigurationError::InvalidValue(format!("LOG_LEVEL '{}': {}", level, e)))?;
    }

    // An empty key in the file counts as not configured
    if config.cwa.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
        config.cwa.api_key = None;
    }

    Ok(())
}

/// Error depicting errors that occur while loading configuration
///
#[derive(Debug, Error)]
pub enum LoadConfigurationError {
    #[error("FileError: {0}")]
    FileError(#[from] std::io::Error),
    #[error("ParseError: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("InvalidValue: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<String, String>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let mut config = Config::default();
        apply_env(&mut config, vars(&[])).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cwa.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.cwa.dataset, DEFAULT_DATASET);
        assert!(config.cwa.api_key.is_none());
        assert_eq!(config.general.log_level, LevelFilter::Info);
    }

    #[test]
    fn env_overrides_file() {
        let mut config: Config = toml::from_str(r#"
            [server]
            port = 8080

            [cwa]
            api_key = "from-file"
            timeout_secs = 10

            [general]
            log_level = "Debug"
            log_to_stdout = false
        "#).unwrap();

        apply_env(&mut config, vars(&[("PORT", "4000"), ("CWA_API_KEY", "CWA-123")])).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.cwa.api_key.as_deref(), Some("CWA-123"));
        assert_eq!(config.cwa.timeout_secs, 10);
        assert_eq!(config.general.log_level, LevelFilter::Debug);
        assert!(!config.general.log_to_stdout);
    }

    #[test]
    fn blank_api_key_is_not_configured() {
        let mut config = Config::default();
        apply_env(&mut config, vars(&[("CWA_API_KEY", "  ")])).unwrap();

        assert!(config.cwa.api_key.is_none());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = Config::default();
        let result = apply_env(&mut config, vars(&[("PORT", "http")]));

        assert!(matches!(result, Err(LoadConfigurationError::InvalidValue(_))));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = load_config(Some("/nonexistent/weather_proxy.toml"));

        assert!(matches!(result, Err(LoadConfigurationError::FileError(_))));
    }
}
