//! Forecast aggregation and derived display metrics.
//!
//! Everything here is pure: no I/O, no shared state. Callers hand in samples
//! already converted from the upstream payloads and get render-ready values
//! back.

pub mod aggregator;
pub mod metrics;
pub mod models;

pub use aggregator::{select_daily_summaries, select_hourly_window, HourWindow};
pub use metrics::{
    arc_position, classify_aqi, classify_uv, derive_sun_window, derive_wind_display,
    map_condition_to_icon, particle_effect, pollutant_gauges, sun_brightness, visibility_km,
    wind_particle_count, AqiCategory, ArcPoint, ParticleEffect, PollutantGauge,
    SunProgress, UvLevel, WindDisplay,
};
pub use models::{AirQualitySample, DailySummary, Reading, SunWindow, WeatherSample};
