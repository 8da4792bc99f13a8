use serde::Serialize;

use super::models::{AirQualitySample, WeatherSample};

/// Icon token for conditions not in the table
pub const DEFAULT_ICON: &str = "fas fa-cloud";

pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const SECTOR_DEGREES: f64 = 360.0 / 16.0;

/// Control points of the sun-arc widget, in its own local coordinates.
pub const ARC_START: ArcPoint = ArcPoint { x: 40.0, y: 140.0 };
pub const ARC_CONTROL: ArcPoint = ArcPoint { x: 140.0, y: 40.0 };
pub const ARC_END: ArcPoint = ArcPoint { x: 240.0, y: 140.0 };

// ============================================================================
// Wind
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindDisplay {
    pub speed_kmh: i64,
    pub compass_label: &'static str,
    pub degree: f64,
}

pub fn derive_wind_display(sample: &WeatherSample) -> WindDisplay {
    let degree = sample.wind_degree.unwrap_or(0.0);
    WindDisplay {
        speed_kmh: (sample.wind_speed_ms * 3.6).round() as i64,
        compass_label: compass_label(degree),
        degree,
    }
}

/// Nearest of the 16 compass points, each covering 22.5°.
pub fn compass_label(degree: f64) -> &'static str {
    let index = (degree / SECTOR_DEGREES).round() as i64;
    COMPASS_POINTS[index.rem_euclid(16) as usize]
}

/// Number of drifting particles drawn on the compass for a wind speed.
pub fn wind_particle_count(speed_kmh: i64) -> u32 {
    let count = speed_kmh.max(0) / 5 + 3;
    count.min(15) as u32
}

// ============================================================================
// Sun
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunProgress {
    pub daylight_hours: i64,
    pub daylight_minutes: i64,
    /// 0 at sunrise, 1 at sunset
    pub elapsed_fraction: f64,
}

/// Daylight length and how far `now` sits between sunrise and sunset.
///
/// A zero or negative window reports no daylight and a fraction of 0.
pub fn derive_sun_window(sunrise_utc: i64, sunset_utc: i64, now_utc: i64) -> SunProgress {
    let daylight = sunset_utc - sunrise_utc;
    if daylight <= 0 {
        return SunProgress {
            daylight_hours: 0,
            daylight_minutes: 0,
            elapsed_fraction: 0.0,
        };
    }

    let elapsed = (now_utc - sunrise_utc) as f64 / daylight as f64;

    SunProgress {
        daylight_hours: daylight / 3600,
        daylight_minutes: (daylight % 3600) / 60,
        elapsed_fraction: unit_clamp(elapsed),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcPoint {
    pub x: f64,
    pub y: f64,
}

/// Point on the quadratic Bézier sun arc at `fraction`.
pub fn arc_position(fraction: f64) -> ArcPoint {
    let t = unit_clamp(fraction);
    let u = 1.0 - t;
    let bezier = |p0: f64, p1: f64, p2: f64| u * u * p0 + 2.0 * u * t * p1 + t * t * p2;

    ArcPoint {
        x: bezier(ARC_START.x, ARC_CONTROL.x, ARC_END.x),
        y: bezier(ARC_START.y, ARC_CONTROL.y, ARC_END.y),
    }
}

/// Sun glyph opacity; dimmer near the horizon.
pub fn sun_brightness(fraction: f64) -> f64 {
    1.0 - (unit_clamp(fraction) - 0.5).abs() * 0.4
}

fn unit_clamp(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ============================================================================
// Air quality
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiCategory {
    pub level: i32,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

pub fn classify_aqi(level: i32) -> AqiCategory {
    let (label, color) = match level {
        1 => ("Good", Some("#00e400")),
        2 => ("Fair", Some("#ffff00")),
        3 => ("Moderate", Some("#ff7e00")),
        4 => ("Poor", Some("#ff0000")),
        5 => ("Very Poor", Some("#8f3f97")),
        _ => ("Unknown", None),
    };

    AqiCategory {
        level,
        label,
        color,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantGauge {
    pub name: &'static str,
    /// µg/m³
    pub value: f64,
    /// Bar fill, 0..=100
    pub percent: f64,
}

/// Gauge fills against fixed reference concentrations (PM2.5 50, PM10 100,
/// O3 180, NO2 200 µg/m³).
pub fn pollutant_gauges(sample: &AirQualitySample) -> [PollutantGauge; 4] {
    let gauge = |name, value: f64, reference: f64| PollutantGauge {
        name,
        value,
        percent: (value / reference * 100.0).clamp(0.0, 100.0),
    };

    [
        gauge("pm2_5", sample.pm2_5, 50.0),
        gauge("pm10", sample.pm10, 100.0),
        gauge("o3", sample.o3, 180.0),
        gauge("no2", sample.no2, 200.0),
    ]
}

// ============================================================================
// UV
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UvLevel {
    Measured {
        index: f64,
        status: &'static str,
        color: &'static str,
        recommendation: &'static str,
        /// Ring fill, 0..=100
        progress: f64,
    },
    /// The upstream endpoint reported no UV index
    Unavailable,
}

const UV_BANDS: [(f64, &str, &str, &str); 5] = [
    (2.0, "Low", "#00e400", "No protection needed"),
    (5.0, "Moderate", "#ffff00", "Wear sunscreen"),
    (7.0, "High", "#ff7e00", "Protection required"),
    (10.0, "Very High", "#ff0000", "Extra protection needed"),
    (f64::INFINITY, "Extreme", "#8f3f97", "Avoid sun exposure"),
];

pub fn classify_uv(index: Option<f64>) -> UvLevel {
    let Some(index) = index.filter(|i| i.is_finite()) else {
        return UvLevel::Unavailable;
    };

    let (_, status, color, recommendation) = UV_BANDS
        .iter()
        .copied()
        .find(|(max, ..)| index <= *max)
        .unwrap_or(UV_BANDS[UV_BANDS.len() - 1]);

    UvLevel::Measured {
        index,
        status,
        color,
        recommendation,
        progress: (index / 11.0 * 100.0).clamp(0.0, 100.0),
    }
}

// ============================================================================
// Conditions
// ============================================================================

/// Icon token for an upstream condition category. Exact match after
/// lowercasing; anything else gets [`DEFAULT_ICON`].
pub fn map_condition_to_icon(condition: &str) -> &'static str {
    match condition.to_lowercase().as_str() {
        "clear" => "fas fa-sun",
        "clouds" => "fas fa-cloud",
        "rain" | "drizzle" => "fas fa-cloud-rain",
        "thunderstorm" => "fas fa-bolt",
        "snow" => "fas fa-snowflake",
        "mist" | "smoke" | "haze" | "dust" | "fog" | "sand" | "ash" => "fas fa-smog",
        "squall" | "tornado" => "fas fa-wind",
        _ => DEFAULT_ICON,
    }
}

/// Metres to kilometres, one decimal place.
pub fn visibility_km(metres: f64) -> f64 {
    (metres / 100.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleEffect {
    Rain,
    Snow,
}

/// Background particle animation for the current condition, if any.
pub fn particle_effect(condition: &str) -> Option<ParticleEffect> {
    match condition.to_lowercase().as_str() {
        "rain" | "drizzle" => Some(ParticleEffect::Rain),
        "snow" => Some(ParticleEffect::Snow),
        _ => None,
    }
}
