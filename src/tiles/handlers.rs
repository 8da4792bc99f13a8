use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use thiserror::Error;

use crate::error::HttpError;
use crate::impl_into_response;
use crate::openweather::{MapTile, ProviderError, TileLayer};
use crate::AppState;

#[derive(Error, Debug)]
pub enum TileError {
    #[error("Unknown map layer: {0}")]
    UnknownLayer(String),

    #[error("Failed to fetch map tile: {0}")]
    Provider(#[from] ProviderError),
}

impl HttpError for TileError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownLayer(_) => StatusCode::BAD_REQUEST,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::UnknownLayer(_) => Some("UNKNOWN_LAYER"),
            Self::Provider(_) => Some("UPSTREAM_FAILURE"),
        }
    }
}

impl_into_response!(TileError);

/// Map overlay tile, fetched server-side so the API key stays private
///
/// GET /api/v1/tiles/{layer}/{z}/{x}/{y}
/// where layer is one of temp_new, clouds_new, precipitation_new
pub async fn get_tile(
    State(state): State<AppState>,
    Path((layer, z, x, y)): Path<(String, u8, u32, u32)>,
) -> Result<impl IntoResponse, TileError> {
    let layer = TileLayer::from_name(&layer).ok_or(TileError::UnknownLayer(layer))?;
    let tile = MapTile { layer, z, x, y };

    let bytes = state.provider.fetch_tile(tile).await?;

    tracing::debug!(layer = layer.name(), z, x, y, size = bytes.len(), "Tile proxied");

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}
