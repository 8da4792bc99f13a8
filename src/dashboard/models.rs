use serde::Serialize;

use crate::forecast::{
    AqiCategory, ArcPoint, ParticleEffect, PollutantGauge, Reading, SunProgress, UvLevel,
    WindDisplay,
};

// ============================================================================
// API Response Models (External - what the browser client renders)
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub location: LocationInfo,
    pub current: CurrentConditions,
    pub wind: WindView,
    /// Absent when the upstream payload had no sunrise/sunset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun: Option<SunView>,
    pub uv: UvLevel,
    pub particles: Option<ParticleEffect>,
    /// `null` renders the "No Data" state
    pub air_quality: Option<AirQualityView>,
    pub daily: Vec<DailyView>,
    pub daily_empty: bool,
    pub hourly: Vec<HourlyPoint>,
}

#[derive(Debug, Serialize)]
pub struct LocationInfo {
    pub city: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub utc_offset_secs: i32,
}

#[derive(Debug, Serialize)]
pub struct CurrentConditions {
    pub timestamp: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub condition: String,
    pub description: String,
    pub icon: &'static str,
    pub humidity: Reading<f64>,
    pub pressure: Reading<f64>,
    pub visibility_km: Reading<f64>,
}

#[derive(Debug, Serialize)]
pub struct WindView {
    #[serde(flatten)]
    pub display: WindDisplay,
    pub particle_count: u32,
}

#[derive(Debug, Serialize)]
pub struct SunView {
    pub sunrise: i64,
    pub sunset: i64,
    #[serde(flatten)]
    pub progress: SunProgress,
    pub arc: ArcPoint,
    pub brightness: f64,
}

#[derive(Debug, Serialize)]
pub struct AirQualityView {
    #[serde(flatten)]
    pub category: AqiCategory,
    pub pollutants: [PollutantGauge; 4],
}

#[derive(Debug, Serialize)]
pub struct DailyView {
    /// ISO date, e.g. "2024-05-11"
    pub date: String,
    /// e.g. "Sat"
    pub weekday: String,
    /// e.g. "May 11"
    pub month_day: String,
    pub timestamp: i64,
    /// Rounded °C, same rule as the hourly chart
    pub temperature: i64,
    pub description: String,
    pub icon: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HourlyPoint {
    pub timestamp: i64,
    /// Local hour, e.g. "03 PM"
    pub label: String,
    pub temperature: i64,
    pub precipitation_pct: Reading<i64>,
}
