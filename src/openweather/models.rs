use serde::Deserialize;

use crate::forecast::{AirQualitySample, SunWindow, WeatherSample};

// ============================================================================
// Geocoding API Response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
    pub state: Option<String>,
}

// ============================================================================
// Data API 2.5 Responses (Internal)
// These structs deserialize the raw API response; not all fields are used
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MainInfo {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct WindInfo {
    pub speed: f64,
    pub deg: Option<f64>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize, Clone)]
pub struct WeatherCondition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct SysInfo {
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// `/data/2.5/weather`
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub dt: i64,
    /// Shift in seconds from UTC
    #[serde(default)]
    pub timezone: i32,
    pub main: MainInfo,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub wind: Option<WindInfo>,
    pub visibility: Option<f64>,
    pub sys: Option<SysInfo>,
}

/// `/data/2.5/forecast`
#[derive(Debug, Deserialize)]
pub struct ForecastListResponse {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
    pub city: Option<ForecastCity>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainInfo,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub wind: Option<WindInfo>,
    pub visibility: Option<f64>,
    /// Probability of precipitation
    pub pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastCity {
    #[serde(default)]
    pub timezone: i32,
}

/// `/data/2.5/air_pollution`
#[derive(Debug, Deserialize)]
pub struct AirPollutionResponse {
    #[serde(default)]
    pub list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
pub struct AirPollutionEntry {
    pub main: AqiIndex,
    pub components: PollutantComponents,
}

#[derive(Debug, Deserialize)]
pub struct AqiIndex {
    pub aqi: i32,
}

#[derive(Debug, Deserialize)]
pub struct PollutantComponents {
    #[serde(default)]
    pub pm2_5: f64,
    #[serde(default)]
    pub pm10: f64,
    #[serde(default)]
    pub o3: f64,
    #[serde(default)]
    pub no2: f64,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

// ============================================================================
// Provider Output (what the rest of the crate consumes)
// ============================================================================

/// First geocoding match for a location query
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
    pub country_code: String,
    pub state: Option<String>,
}

impl From<GeoLocation> for Location {
    fn from(g: GeoLocation) -> Self {
        Location {
            lat: g.lat,
            lon: g.lon,
            display_name: g.name,
            country_code: g.country,
            state: g.state,
        }
    }
}

/// Present-time conditions for a location
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub sample: WeatherSample,
    pub sun: Option<SunWindow>,
    pub utc_offset_secs: i32,
}

/// Three-hourly forecast for a location
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub samples: Vec<WeatherSample>,
    pub utc_offset_secs: i32,
}

/// Map overlays the tile endpoint passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileLayer {
    Temperature,
    Clouds,
    Precipitation,
}

impl TileLayer {
    /// Parse the upstream layer name, e.g. "temp_new"
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "temp_new" => Some(Self::Temperature),
            "clouds_new" => Some(Self::Clouds),
            "precipitation_new" => Some(Self::Precipitation),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Temperature => "temp_new",
            Self::Clouds => "clouds_new",
            Self::Precipitation => "precipitation_new",
        }
    }
}

/// One slippy-map tile of an overlay layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapTile {
    pub layer: TileLayer,
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

fn to_sample(
    dt: i64,
    main: MainInfo,
    weather: Vec<WeatherCondition>,
    wind: Option<WindInfo>,
    visibility: Option<f64>,
    pop: Option<f64>,
) -> WeatherSample {
    let condition = weather.into_iter().next();
    WeatherSample {
        timestamp_utc: dt,
        temperature_c: main.temp,
        feels_like_c: main.feels_like,
        condition_main: condition
            .as_ref()
            .map(|c| c.main.clone())
            .unwrap_or_default(),
        condition_description: condition.map(|c| c.description).unwrap_or_default(),
        wind_speed_ms: wind.as_ref().map(|w| w.speed).unwrap_or_default(),
        wind_degree: wind.and_then(|w| w.deg),
        humidity_pct: main.humidity,
        pressure_hpa: main.pressure,
        visibility_m: visibility,
        precipitation_probability: pop,
    }
}

impl From<CurrentWeatherResponse> for Observation {
    fn from(c: CurrentWeatherResponse) -> Self {
        let sun = c.sys.and_then(|s| match (s.sunrise, s.sunset) {
            (Some(sunrise), Some(sunset)) => Some(SunWindow::new(sunrise, sunset)),
            _ => None,
        });

        Observation {
            sample: to_sample(c.dt, c.main, c.weather, c.wind, c.visibility, None),
            sun,
            utc_offset_secs: c.timezone,
        }
    }
}

impl From<ForecastEntry> for WeatherSample {
    fn from(e: ForecastEntry) -> Self {
        to_sample(e.dt, e.main, e.weather, e.wind, e.visibility, e.pop)
    }
}

impl From<ForecastListResponse> for ForecastSeries {
    fn from(f: ForecastListResponse) -> Self {
        ForecastSeries {
            samples: f.list.into_iter().map(WeatherSample::from).collect(),
            utc_offset_secs: f.city.map(|c| c.timezone).unwrap_or_default(),
        }
    }
}

impl AirPollutionResponse {
    /// The first entry, or `None` when the provider has no reading
    pub fn into_sample(self) -> Option<AirQualitySample> {
        self.list.into_iter().next().map(|e| AirQualitySample {
            aqi: e.main.aqi,
            pm2_5: e.components.pm2_5,
            pm10: e.components.pm10,
            o3: e.components.o3,
            no2: e.components.no2,
        })
    }
}
