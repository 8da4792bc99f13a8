use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::models::WeatherResponse;
use crate::error::HttpError;
use crate::extractors::{CityParam, MissingCity};
use crate::impl_into_response;
use crate::openweather::ProviderError;
use crate::AppState;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error(transparent)]
    MissingCity(#[from] MissingCity),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCity(_) => StatusCode::BAD_REQUEST,
            Self::Provider(err) => err.status_code(),
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::MissingCity(_) => Some("MISSING_CITY"),
            Self::Provider(err) => err.error_code(),
        }
    }
}

impl_into_response!(WeatherError);

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Current conditions only, fetched server-side so the API key stays private
///
/// GET /api/v1/weather?city=Adama
/// GET /api/v1/weather/{city}
pub async fn get_weather(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<WeatherResponse>, WeatherError> {
    let city = city.or_default(state.config.default_city.clone())?;

    let location = state.provider.geocode(&city).await?;
    let observation = state.provider.fetch_current(&location).await?;

    tracing::info!(
        city = %location.display_name,
        temp = %observation.sample.temperature_c,
        "Weather data fetched successfully"
    );

    Ok(Json(WeatherResponse::new(location, observation)))
}
