use serde::Serialize;

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEntry {
    pub start_time: String,
    pub end_time: String,
    pub weather: String,
    pub rain: String,
    pub min_temp: String,
    pub max_temp: String,
    pub comfort: String,
    pub wind_speed: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CityForecast {
    pub city: String,
    pub forecasts: Vec<ForecastEntry>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WeatherListing {
    pub success: bool,
    pub update_time: String,
    pub data: Vec<CityForecast>,
}

#[derive(Serialize, Debug)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub all_cities: &'static str,
    pub health: &'static str,
}

#[derive(Serialize, Debug)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub endpoints: Endpoints,
}
