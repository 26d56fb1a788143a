use thiserror::Error;
use crate::manager_forecast::models::{Location, WeatherElement};
use crate::models::{CityForecast, ForecastEntry};

/// Forecast fields an upstream element tag can map to
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Weather,
    Rain,
    MinTemp,
    MaxTemp,
    Comfort,
    WindSpeed,
}

impl Field {
    /// Maps an upstream element name to a forecast field, None for tags we don't know
    ///
    /// # Arguments
    ///
    /// * 'tag' - the upstream element name
    fn from_tag(tag: &str) -> Option<Field> {
        match tag {
            "Wx" => Some(Field::Weather),
            "PoP" => Some(Field::Rain),
            "MinT" | "T" => Some(Field::MinTemp),
            "MaxT" => Some(Field::MaxTemp),
            "CI" => Some(Field::Comfort),
            "WS" => Some(Field::WindSpeed),
            _ => None,
        }
    }

    /// Writes the value into the entry, adding whatever unit suffix the field carries
    ///
    /// # Arguments
    ///
    /// * 'entry' - the entry to update
    /// * 'value' - the raw upstream value
    fn apply(self, entry: &mut ForecastEntry, value: &str) {
        match self {
            Field::Weather => entry.weather = value.to_string(),
            Field::Rain => entry.rain = format!("{}%", value),
            Field::MinTemp => entry.min_temp = format!("{}°C", value),
            Field::MaxTemp => entry.max_temp = format!("{}°C", value),
            Field::Comfort => entry.comfort = value.to_string(),
            Field::WindSpeed => entry.wind_speed = value.to_string(),
        }
    }
}

/// Transforms the upstream location list into one simplified forecast per city
///
/// City order and time window order are kept as delivered by the upstream.
///
/// # Arguments
///
/// * 'locations' - the upstream location list, if any
pub fn to_city_forecasts(locations: Option<&[Location]>) -> Result<Vec<CityForecast>, TransformError> {
    let locations = match locations {
        Some(l) if !l.is_empty() => l,
        _ => return Err(TransformError::NoData),
    };

    locations.iter().map(city_forecast).collect()
}

/// Flattens one location into a city forecast
///
/// # Arguments
///
/// * 'location' - the upstream location record
fn city_forecast(location: &Location) -> Result<CityForecast, TransformError> {
    // Time windows come from the first element we know, unknown tags never decide the shape
    let first = location.weather_element
        .iter()
        .find(|e| Field::from_tag(&e.element_name).is_some())
        .or_else(|| location.weather_element.first());
    let Some(first) = first else {
        return Ok(CityForecast { city: location.location_name.clone(), forecasts: Vec::new() });
    };
    let time_count = first.time.len();

    check_time_windows(location, time_count)?;

    let forecasts = first.time
        .iter()
        .enumerate()
        .map(|(i, window)| {
            let mut entry = ForecastEntry {
                start_time: window.start_time.clone(),
                end_time: window.end_time.clone(),
                ..Default::default()
            };

            location.weather_element
                .iter()
                .filter_map(|e| Field::from_tag(&e.element_name).map(|f| (f, e)))
                .for_each(|(field, element)| field.apply(&mut entry, &element.time[i].parameter.parameter_name));

            entry
        })
        .collect::<Vec<ForecastEntry>>();

    Ok(CityForecast { city: location.location_name.clone(), forecasts })
}

/// Makes sure every recognized element of a location shares the same number of time windows
///
/// # Arguments
///
/// * 'location' - the upstream location record
/// * 'time_count' - number of time windows of the first recognized element
fn check_time_windows(location: &Location, time_count: usize) -> Result<(), TransformError> {
    let mismatch = location.weather_element
        .iter()
        .filter(|e| Field::from_tag(&e.element_name).is_some())
        .find(|e: &&WeatherElement| e.time.len() != time_count);

    match mismatch {
        Some(e) => Err(TransformError::TimeWindowMismatch {
            city: location.location_name.clone(),
            element: e.element_name.clone(),
            expected: time_count,
            found: e.time.len(),
        }),
        None => Ok(()),
    }
}

/// Error depicting errors that occur while transforming upstream forecasts
///
#[derive(Error, Debug, PartialEq)]
pub enum TransformError {
    #[error("NoData")]
    NoData,
    #[error("TimeWindowMismatch: {city}/{element} has {found} time windows, expected {expected}")]
    TimeWindowMismatch {
        city: String,
        element: String,
        expected: usize,
        found: usize,
    },
}
