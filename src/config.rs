use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::forecast::HourWindow;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key
    pub openweathermap_api_key: String,

    /// City shown when a request names none
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Directory holding the browser client; unset disables static serving
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<String>,

    /// IANA zone (e.g. "Africa/Addis_Ababa") used for calendar-day bucketing.
    /// When unset, each location's own UTC offset is used.
    #[serde(default)]
    pub display_timezone: Option<String>,

    /// Forecast aggregation settings
    #[serde(default)]
    pub forecast: ForecastConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Number of upcoming days summarised
    #[serde(default = "default_max_days")]
    pub max_days: usize,

    /// Number of three-hour samples in the chart window
    #[serde(default = "default_hourly_count")]
    pub hourly_count: usize,

    /// First local hour a daily representative may fall in
    #[serde(default = "default_preferred_hour_start")]
    pub preferred_hour_start: u32,

    /// Last local hour (inclusive) a daily representative may fall in
    #[serde(default = "default_preferred_hour_end")]
    pub preferred_hour_end: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            max_days: default_max_days(),
            hourly_count: default_hourly_count(),
            preferred_hour_start: default_preferred_hour_start(),
            preferred_hour_end: default_preferred_hour_end(),
        }
    }
}

impl ForecastConfig {
    pub fn hour_window(&self) -> HourWindow {
        HourWindow::new(self.preferred_hour_start, self.preferred_hour_end)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_city() -> String {
    "Adama".to_string()
}

fn default_static_dir() -> Option<String> {
    Some("client".to_string())
}

fn default_max_days() -> usize {
    5
}

fn default_hourly_count() -> usize {
    8
}

fn default_preferred_hour_start() -> u32 {
    12
}

fn default_preferred_hour_end() -> u32 {
    15
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("default_city", default_city())?
            // Load from config file if present
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // Override with environment variables (prefixed with SKYDECK_)
            // e.g. SKYDECK_FORECAST__MAX_DAYS=3
            .add_source(
                Environment::with_prefix("SKYDECK")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Parsed display time zone, if one is configured
    pub fn display_tz(&self) -> Result<Option<chrono_tz::Tz>, ConfigError> {
        self.display_timezone
            .as_deref()
            .map(|name| {
                name.parse::<chrono_tz::Tz>().map_err(|_| {
                    ConfigError::Message(format!("Invalid display_timezone: {}", name))
                })
            })
            .transpose()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.display_tz()?;

        let forecast = &self.forecast;
        if forecast.preferred_hour_start > forecast.preferred_hour_end
            || forecast.preferred_hour_end > 23
        {
            return Err(ConfigError::Message(format!(
                "Invalid preferred hour window: {}..={}",
                forecast.preferred_hour_start, forecast.preferred_hour_end
            )));
        }

        Ok(())
    }
}
