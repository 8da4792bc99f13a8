use axum::{extract::State, Json};

use super::models::DashboardResponse;
use super::DashboardError;
use crate::extractors::CityParam;
use crate::AppState;

/// Everything the dashboard page renders for one location
///
/// GET /api/v1/dashboard?city=Adama
/// GET /api/v1/dashboard/{city}
pub async fn get_dashboard(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<DashboardResponse>, DashboardError> {
    let city = city.or_default(state.config.default_city.clone())?;

    let dashboard = state
        .dashboard_service
        .build(&city, chrono::Utc::now())
        .await?;
    Ok(Json(dashboard))
}
