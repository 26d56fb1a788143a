pub mod errors;
pub mod models;

use std::time::Duration;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use anyhow::Result;
use crate::config::Cwa;
use crate::manager_forecast::errors::ForecastError;
use crate::manager_forecast::models::ForecastResponse;

/// Anything able to deliver the nationwide forecast dataset
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetches the forecast dataset, authorizing with the given API key
    ///
    /// # Arguments
    ///
    /// * 'api_key' - key passed to the upstream as authorization parameter
    async fn fetch_forecast(&self, api_key: &str) -> Result<ForecastResponse, ForecastError>;
}

/// Struct for fetching weather forecasts from the CWA open data API
pub struct Forecast {
    client: Client,
    base_url: String,
    dataset: String,
}

impl Forecast {
    /// Returns a forecast struct ready for fetching forecasts
    ///
    /// # Arguments
    ///
    /// * 'config' - upstream configuration to use
    pub fn new(config: &Cwa) -> Result<Forecast, ForecastError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Forecast {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dataset: config.dataset.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.dataset)
    }
}

#[async_trait]
impl ForecastSource for Forecast {
    async fn fetch_forecast(&self, api_key: &str) -> Result<ForecastResponse, ForecastError> {
        let url = self.url();
        debug!("fetching forecast dataset from {}", url);

        let response = self.client
            .get(url)
            .query(&[("Authorization", api_key), ("format", "JSON")])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let text = response.text().await
                .unwrap_or_else(|e| {
                    warn!("could not read upstream error body for status {}: {}", status, e);
                    String::new()
                });
            return Err(ForecastError::from_status(status.as_u16(), status.canonical_reason(), &text));
        }

        let json = response.text().await?;

        let forecast: ForecastResponse = serde_json::from_str(&json)
            .map_err(|e| ForecastError::DocumentError(e.to_string()))?;

        Ok(forecast)
    }
}
