use async_trait::async_trait;
use axum::{body::Bytes, http::StatusCode};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::models::*;
use crate::error::HttpError;
use crate::forecast::AirQualitySample;
use crate::impl_into_response;

const GEOCODING_API_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
const CURRENT_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FORECAST_API_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
const AIR_POLLUTION_API_URL: &str = "https://api.openweathermap.org/data/2.5/air_pollution";
const TILE_API_URL: &str = "https://tile.openweathermap.org/map";

/// Samples are always requested in Celsius and metres/second
const UNITS: &str = "metric";

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to fetch data: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("API error: {0}")]
    ApiError(String),
}

impl HttpError for ProviderError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CityNotFound(_) => StatusCode::NOT_FOUND,
            Self::RequestError(_) => StatusCode::BAD_GATEWAY,
            Self::ApiError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::CityNotFound(_) => Some("CITY_NOT_FOUND"),
            Self::RequestError(_) => Some("REQUEST_ERROR"),
            Self::ApiError(_) => Some("API_ERROR"),
        }
    }
}

impl_into_response!(ProviderError);

/// The upstream reads a dashboard needs
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// First match for a free-text location query
    async fn geocode(&self, query: &str) -> Result<Location, ProviderError>;

    async fn fetch_current(&self, location: &Location) -> Result<Observation, ProviderError>;

    async fn fetch_forecast(&self, location: &Location) -> Result<ForecastSeries, ProviderError>;

    /// `Ok(None)` when the provider has no reading for the location
    async fn fetch_air_quality(
        &self,
        location: &Location,
    ) -> Result<Option<AirQualitySample>, ProviderError>;

    /// PNG bytes of one map overlay tile
    async fn fetch_tile(&self, tile: MapTile) -> Result<Bytes, ProviderError>;
}

pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(client: Client, api_key: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
        }
    }

    fn coordinates(&self, location: &Location) -> Vec<(&'static str, String)> {
        vec![
            ("lat", location.lat.to_string()),
            ("lon", location.lon.to_string()),
            ("units", UNITS.to_string()),
            ("appid", self.api_key.clone()),
        ]
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        tracing::debug!(url = %url, status = %status, "Received OpenWeatherMap response");

        if !status.is_success() {
            let error: ApiErrorBody = response.json().await.unwrap_or(ApiErrorBody {
                message: format!("HTTP {}", status),
            });
            return Err(ProviderError::ApiError(error.message));
        }

        Ok(response.json().await?)
    }
}

fn tile_url(tile: &MapTile) -> String {
    format!(
        "{}/{}/{}/{}/{}.png",
        TILE_API_URL,
        tile.layer.name(),
        tile.z,
        tile.x,
        tile.y
    )
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn geocode(&self, query: &str) -> Result<Location, ProviderError> {
        tracing::debug!(query = %query, "Geocoding location");

        let locations: Vec<GeoLocation> = self
            .get_json(
                GEOCODING_API_URL,
                &[
                    ("q", query.to_string()),
                    ("limit", "1".to_string()),
                    ("appid", self.api_key.clone()),
                ],
            )
            .await?;

        locations
            .into_iter()
            .next()
            .map(Location::from)
            .ok_or_else(|| ProviderError::CityNotFound(query.to_string()))
    }

    async fn fetch_current(&self, location: &Location) -> Result<Observation, ProviderError> {
        let data: CurrentWeatherResponse = self
            .get_json(CURRENT_API_URL, &self.coordinates(location))
            .await?;
        Ok(data.into())
    }

    async fn fetch_forecast(&self, location: &Location) -> Result<ForecastSeries, ProviderError> {
        let data: ForecastListResponse = self
            .get_json(FORECAST_API_URL, &self.coordinates(location))
            .await?;

        tracing::debug!(
            city = %location.display_name,
            samples = data.list.len(),
            "Fetched forecast"
        );

        Ok(data.into())
    }

    async fn fetch_air_quality(
        &self,
        location: &Location,
    ) -> Result<Option<AirQualitySample>, ProviderError> {
        let data: AirPollutionResponse = self
            .get_json(AIR_POLLUTION_API_URL, &self.coordinates(location))
            .await?;
        Ok(data.into_sample())
    }

    async fn fetch_tile(&self, tile: MapTile) -> Result<Bytes, ProviderError> {
        let url = tile_url(&tile);
        let response = self
            .client
            .get(&url)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(url = %url, status = %status, "Received tile response");

        if !status.is_success() {
            return Err(ProviderError::ApiError(format!("HTTP {}", status)));
        }

        Ok(response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> Location {
        Location {
            lat: 8.54,
            lon: 39.27,
            display_name: "Adama".to_string(),
            country_code: "ET".to_string(),
            state: None,
        }
    }

    #[test]
    fn test_coordinates_query() {
        let client = OpenWeatherClient::new(Client::new(), "test_api_key");
        let query = client.coordinates(&location());

        assert_eq!(query[0], ("lat", "8.54".to_string()));
        assert_eq!(query[1], ("lon", "39.27".to_string()));
        assert_eq!(query[2], ("units", "metric".to_string()));
        assert_eq!(query[3], ("appid", "test_api_key".to_string()));
    }

    #[test]
    fn test_tile_url() {
        let tile = MapTile {
            layer: TileLayer::Precipitation,
            z: 5,
            x: 19,
            y: 15,
        };
        assert_eq!(
            tile_url(&tile),
            "https://tile.openweathermap.org/map/precipitation_new/5/19/15.png"
        );
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ProviderError::CityNotFound("Atlantis".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ProviderError::ApiError("Invalid API key".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ProviderError::CityNotFound("Atlantis".into()).error_code(),
            Some("CITY_NOT_FOUND")
        );
    }
}
