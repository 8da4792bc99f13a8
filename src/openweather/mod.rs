mod client;
pub mod models;

pub use client::{OpenWeatherClient, ProviderError, WeatherProvider};
pub use models::{ForecastSeries, Location, MapTile, Observation, TileLayer};
