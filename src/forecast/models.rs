use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// Text shown in place of a value the upstream payload did not carry.
pub const PLACEHOLDER: &str = "--";

// ============================================================================
// Samples
// ============================================================================

/// One observation or forecast point at a specific instant.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    /// Seconds since the Unix epoch
    pub timestamp_utc: i64,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    /// Short category such as "Rain" or "Clear", compared case-insensitively
    pub condition_main: String,
    pub condition_description: String,
    pub wind_speed_ms: f64,
    /// Degrees clockwise from north
    pub wind_degree: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub visibility_m: Option<f64>,
    /// Fraction in 0.0..=1.0
    pub precipitation_probability: Option<f64>,
}

/// The sample chosen to stand in for a whole calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub sample: WeatherSample,
}

/// Pollutant concentrations in µg/m³ plus the provider's 1..=5 AQI category.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualitySample {
    pub aqi: i32,
    pub pm2_5: f64,
    pub pm10: f64,
    pub o3: f64,
    pub no2: f64,
}

/// Sunrise and sunset instants in UTC seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunWindow {
    pub sunrise_utc: i64,
    pub sunset_utc: i64,
}

impl SunWindow {
    pub fn new(sunrise_utc: i64, sunset_utc: i64) -> Self {
        Self {
            sunrise_utc,
            sunset_utc,
        }
    }
}

// ============================================================================
// Optional readings
// ============================================================================

/// A display value that may be missing upstream.
///
/// Serializes as the bare value, or as [`PLACEHOLDER`] when unavailable, so a
/// missing humidity or pressure never fails the whole payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<T> {
    Value(T),
    Unavailable,
}

impl<T> Reading<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        match self {
            Reading::Value(v) => Reading::Value(f(v)),
            Reading::Unavailable => Reading::Unavailable,
        }
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Reading::Value(v),
            None => Reading::Unavailable,
        }
    }
}

impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Value(v) => v.serialize(serializer),
            Reading::Unavailable => serializer.serialize_str(PLACEHOLDER),
        }
    }
}
