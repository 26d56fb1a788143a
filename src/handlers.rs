use chrono::{SecondsFormat, Utc};
use log::info;
use crate::errors::ApiError;
use crate::manager_forecast::ForecastSource;
use crate::models::{Endpoints, HealthStatus, ServiceInfo, WeatherListing};
use crate::transformer::to_city_forecasts;

pub const ALL_CITIES_PATH: &str = "/api/weather/all";
pub const HEALTH_PATH: &str = "/api/health";

/// Returns a description of the available endpoints
///
pub fn service_info() -> ServiceInfo {
    ServiceInfo {
        message: "台灣天氣預報 API",
        endpoints: Endpoints {
            all_cities: ALL_CITIES_PATH,
            health: HEALTH_PATH,
        },
    }
}

pub fn health() -> HealthStatus {
    HealthStatus { status: "OK", timestamp: iso_now() }
}

/// Fetches the nationwide forecast and returns it reshaped per city
///
/// The API key is checked before anything is sent upstream.
///
/// # Arguments
///
/// * 'api_key' - configured upstream API key, if any
/// * 'source' - where to fetch the forecast from
pub async fn all_cities(api_key: Option<&str>, source: &dyn ForecastSource) -> Result<WeatherListing, ApiError> {
    let api_key = api_key.ok_or(ApiError::ConfigurationError)?;

    let response = source.fetch_forecast(api_key).await?;
    let data = to_city_forecasts(response.locations())?;

    info!("forecast delivered for {} cities", data.len());

    Ok(WeatherListing {
        success: true,
        update_time: iso_now(),
        data,
    })
}

/// Current time in ISO-8601 with millisecond precision, Z suffixed
///
fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
pub mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use chrono::DateTime;
    use serde_json::{json, Value};
    use crate::manager_forecast::errors::ForecastError;
    use crate::manager_forecast::models::ForecastResponse;
    use super::*;

    /// Upstream double answering with a canned result and counting calls
    pub struct CannedSource {
        pub calls: AtomicUsize,
        reply: fn() -> Result<ForecastResponse, ForecastError>,
    }

    impl CannedSource {
        pub fn new(reply: fn() -> Result<ForecastResponse, ForecastError>) -> Self {
            CannedSource { calls: AtomicUsize::new(0), reply }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ForecastSource for CannedSource {
        async fn fetch_forecast(&self, _api_key: &str) -> Result<ForecastResponse, ForecastError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    pub fn two_cities() -> Result<ForecastResponse, ForecastError> {
        let json = json!({
            "success": "true",
            "records": {
                "location": [
                    {
                        "locationName": "嘉義縣",
                        "weatherElement": [
                            {"elementName": "Wx", "time": [
                                {"startTime": "2026-10-17 18:00:00", "endTime": "2026-10-18 06:00:00", "parameter": {"parameterName": "晴時多雲"}},
                                {"startTime": "2026-10-18 06:00:00", "endTime": "2026-10-18 18:00:00", "parameter": {"parameterName": "多雲"}}
                            ]},
                            {"elementName": "PoP", "time": [
                                {"startTime": "2026-10-17 18:00:00", "endTime": "2026-10-18 06:00:00", "parameter": {"parameterName": "60"}},
                                {"startTime": "2026-10-18 06:00:00", "endTime": "2026-10-18 18:00:00", "parameter": {"parameterName": "10"}}
                            ]}
                        ]
                    },
                    {
                        "locationName": "新北市",
                        "weatherElement": [
                            {"elementName": "MinT", "time": [
                                {"startTime": "2026-10-17 18:00:00", "endTime": "2026-10-18 06:00:00", "parameter": {"parameterName": "20"}},
                                {"startTime": "2026-10-18 06:00:00", "endTime": "2026-10-18 18:00:00", "parameter": {"parameterName": "22"}}
                            ]}
                        ]
                    }
                ]
            }
        });
        Ok(serde_json::from_value(json).unwrap())
    }

    pub fn no_locations() -> Result<ForecastResponse, ForecastError> {
        Ok(serde_json::from_value(json!({"success": "true", "records": {"location": []}})).unwrap())
    }

    pub fn rate_limited() -> Result<ForecastResponse, ForecastError> {
        Err(ForecastError::from_status(503, Some("Service Unavailable"), r#"{"message":"rate limited"}"#))
    }

    fn unparsable() -> Result<ForecastResponse, ForecastError> {
        Err(ForecastError::DocumentError("expected value at line 1 column 1".to_string()))
    }

    #[tokio::test]
    async fn missing_api_key_never_calls_upstream() {
        let source = CannedSource::new(two_cities);

        let result = all_cities(None, &source).await;

        let e = result.unwrap_err();
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.body().error, "伺服器設定錯誤");
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn forecast_is_reshaped_per_city() {
        let source = CannedSource::new(two_cities);

        let listing = all_cities(Some("CWA-KEY"), &source).await.unwrap();

        assert_eq!(source.calls(), 1);
        assert!(listing.success);
        assert!(DateTime::parse_from_rfc3339(&listing.update_time).is_ok());
        assert_eq!(listing.data.len(), 2);
        assert_eq!(listing.data[0].city, "嘉義縣");
        assert_eq!(listing.data[0].forecasts.len(), 2);
        assert_eq!(listing.data[0].forecasts[0].rain, "60%");
        assert_eq!(listing.data[0].forecasts[1].weather, "多雲");
        assert_eq!(listing.data[1].city, "新北市");
        assert_eq!(listing.data[1].forecasts[1].min_temp, "22°C");
    }

    #[tokio::test]
    async fn empty_location_list_is_not_found() {
        let source = CannedSource::new(no_locations);

        let e = all_cities(Some("CWA-KEY"), &source).await.unwrap_err();

        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(e.body().error, "查無資料");
    }

    #[tokio::test]
    async fn upstream_rejection_is_forwarded() {
        let source = CannedSource::new(rate_limited);

        let e = all_cities(Some("CWA-KEY"), &source).await.unwrap_err();
        let body = e.body();

        assert_eq!(e.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.message.as_deref(), Some("rate limited"));
        assert_eq!(body.details, Some(json!({"message": "rate limited"})));
    }

    #[tokio::test]
    async fn unparsable_upstream_is_a_generic_server_error() {
        let source = CannedSource::new(unparsable);

        let e = all_cities(Some("CWA-KEY"), &source).await.unwrap_err();
        let body = serde_json::to_value(e.body()).unwrap();

        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.get("details"), None::<&Value>);
    }

    #[test]
    fn health_is_ok_with_timestamp() {
        let status = health();

        assert_eq!(status.status, "OK");
        assert!(DateTime::parse_from_rfc3339(&status.timestamp).is_ok());
    }

    #[test]
    fn service_info_lists_endpoints() {
        let info = serde_json::to_value(service_info()).unwrap();

        assert_eq!(info["endpoints"]["allCities"], "/api/weather/all");
        assert_eq!(info["endpoints"]["health"], "/api/health");
    }
}
