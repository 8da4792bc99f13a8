use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::Deserialize;
use thiserror::Error;

/// Query parameters accepted by the weather and dashboard endpoints
#[derive(Debug, Deserialize)]
pub struct CityQuery {
    /// Free-text location, e.g. "Adama" or "London,GB"
    pub city: Option<String>,
}

/// City named by the `{city}` path segment or the `?city=` query parameter.
///
/// The path wins when both are present. `None` lets the handler fall back to
/// the configured default city.
#[derive(Debug)]
pub struct CityParam(pub Option<String>);

/// The request named a city, but only whitespace
#[derive(Error, Debug, PartialEq)]
#[error("Please enter a city name")]
pub struct MissingCity;

impl CityParam {
    /// Get the trimmed city value, or `default` when none was given
    pub fn or_default(self, default: impl Into<String>) -> Result<String, MissingCity> {
        match self.0 {
            None => Ok(default.into()),
            Some(city) => {
                let city = city.trim();
                if city.is_empty() {
                    Err(MissingCity)
                } else {
                    Ok(city.to_string())
                }
            }
        }
    }
}

impl<S> FromRequestParts<S> for CityParam
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(Path(city)) = Path::<String>::from_request_parts(parts, state).await {
            if !city.is_empty() {
                return Ok(CityParam(Some(city)));
            }
        }

        if let Ok(Query(query)) = Query::<CityQuery>::from_request_parts(parts, state).await {
            return Ok(CityParam(query.city));
        }

        Ok(CityParam(None))
    }
}
