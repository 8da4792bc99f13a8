use serde::Serialize;
use utoipa::ToSchema;

use crate::forecast::{derive_wind_display, map_condition_to_icon, visibility_km, Reading};
use crate::openweather::{Location, Observation};

/// Current conditions for one location, as returned by the proxy endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct WeatherResponse {
    pub city: String,
    pub country: String,
    pub timestamp: i64,
    /// °C
    pub temperature: f64,
    /// °C
    pub feels_like: f64,
    pub condition: String,
    pub description: String,
    pub icon: String,
    /// km/h
    pub wind_speed: i64,
    pub wind_direction: String,
    /// Degrees clockwise from north
    pub wind_degree: f64,
    /// % or "--"
    #[schema(value_type = Object)]
    pub humidity: Reading<f64>,
    /// hPa or "--"
    #[schema(value_type = Object)]
    pub pressure: Reading<f64>,
    /// km or "--"
    #[schema(value_type = Object)]
    pub visibility_km: Reading<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<i64>,
}

impl WeatherResponse {
    pub fn new(location: Location, observation: Observation) -> Self {
        let sample = observation.sample;
        let wind = derive_wind_display(&sample);
        Self {
            city: location.display_name,
            country: location.country_code,
            timestamp: sample.timestamp_utc,
            temperature: sample.temperature_c,
            feels_like: sample.feels_like_c,
            icon: map_condition_to_icon(&sample.condition_main).to_string(),
            condition: sample.condition_main,
            description: sample.condition_description,
            wind_speed: wind.speed_kmh,
            wind_direction: wind.compass_label.to_string(),
            wind_degree: wind.degree,
            humidity: sample.humidity_pct.into(),
            pressure: sample.pressure_hpa.into(),
            visibility_km: Reading::from(sample.visibility_m).map(visibility_km),
            sunrise: observation.sun.map(|s| s.sunrise_utc),
            sunset: observation.sun.map(|s| s.sunset_utc),
        }
    }
}
