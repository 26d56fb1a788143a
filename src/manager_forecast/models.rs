use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct ForecastResponse {
    pub records: Option<Records>,
}

#[derive(Deserialize, Debug)]
pub struct Records {
    pub location: Option<Vec<Location>>,
}

#[derive(Deserialize, Debug)]
pub struct Location {
    #[serde(rename = "locationName")]
    pub location_name: String,
    #[serde(rename = "weatherElement", default)]
    pub weather_element: Vec<WeatherElement>,
}

#[derive(Deserialize, Debug)]
pub struct WeatherElement {
    #[serde(rename = "elementName")]
    pub element_name: String,
    #[serde(default)]
    pub time: Vec<TimeSlot>,
}

#[derive(Deserialize, Debug)]
pub struct TimeSlot {
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    pub parameter: Parameter,
}

#[derive(Deserialize, Debug)]
pub struct Parameter {
    #[serde(rename = "parameterName")]
    pub parameter_name: String,
}

impl ForecastResponse {
    /// Returns the location list of the response, if the upstream included one
    ///
    pub fn locations(&self) -> Option<&[Location]> {
        self.records
            .as_ref()
            .and_then(|r| r.location.as_deref())
    }
}
