use std::fmt::Display;
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use thiserror::Error;

use super::models::*;
use crate::config::ForecastConfig;
use crate::error::HttpError;
use crate::extractors::MissingCity;
use crate::forecast::{
    arc_position, classify_aqi, classify_uv, derive_sun_window, derive_wind_display,
    map_condition_to_icon, particle_effect, pollutant_gauges, select_daily_summaries,
    select_hourly_window, sun_brightness, visibility_km, wind_particle_count, AirQualitySample,
    DailySummary, Reading, WeatherSample,
};
use crate::impl_into_response;
use crate::openweather::{ForecastSeries, Location, Observation, ProviderError, WeatherProvider};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Please enter a city name")]
    MissingCity,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Failed to fetch weather data: {0}")]
    UpstreamFailure(ProviderError),
}

impl From<ProviderError> for DashboardError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::CityNotFound(city) => Self::CityNotFound(city),
            other => Self::UpstreamFailure(other),
        }
    }
}

impl From<MissingCity> for DashboardError {
    fn from(_: MissingCity) -> Self {
        Self::MissingCity
    }
}

impl HttpError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCity => StatusCode::BAD_REQUEST,
            Self::CityNotFound(_) => StatusCode::NOT_FOUND,
            Self::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::MissingCity => Some("MISSING_CITY"),
            Self::CityNotFound(_) => Some("CITY_NOT_FOUND"),
            Self::UpstreamFailure(_) => Some("UPSTREAM_FAILURE"),
        }
    }
}

impl_into_response!(DashboardError);

pub struct DashboardService {
    provider: Arc<dyn WeatherProvider>,
    forecast: ForecastConfig,
    display_tz: Option<chrono_tz::Tz>,
}

impl DashboardService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        forecast: ForecastConfig,
        display_tz: Option<chrono_tz::Tz>,
    ) -> Self {
        Self {
            provider,
            forecast,
            display_tz,
        }
    }

    /// Geocode `query`, fetch current, forecast and air quality concurrently,
    /// and assemble everything the dashboard renders.
    ///
    /// Any failed fetch abandons the whole pass.
    pub async fn build(
        &self,
        query: &str,
        now: DateTime<Utc>,
    ) -> Result<DashboardResponse, DashboardError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DashboardError::MissingCity);
        }

        let location = self.provider.geocode(query).await?;

        tracing::debug!(
            city = %location.display_name,
            lat = %location.lat,
            lon = %location.lon,
            "Fetching dashboard data"
        );

        let (observation, forecast, air_quality) = tokio::try_join!(
            self.provider.fetch_current(&location),
            self.provider.fetch_forecast(&location),
            self.provider.fetch_air_quality(&location),
        )?;

        let response = match self.display_tz {
            Some(tz) => self.assemble(
                location,
                observation,
                forecast,
                air_quality,
                now.with_timezone(&tz),
            ),
            None => {
                let offset = FixedOffset::east_opt(forecast.utc_offset_secs)
                    .unwrap_or_else(|| Utc.fix());
                self.assemble(
                    location,
                    observation,
                    forecast,
                    air_quality,
                    now.with_timezone(&offset),
                )
            }
        };

        tracing::info!(
            city = %response.location.city,
            days = response.daily.len(),
            hourly = response.hourly.len(),
            air_quality = response.air_quality.is_some(),
            "Dashboard assembled"
        );

        Ok(response)
    }

    fn assemble<Tz>(
        &self,
        location: Location,
        observation: Observation,
        forecast: ForecastSeries,
        air_quality: Option<AirQualitySample>,
        now: DateTime<Tz>,
    ) -> DashboardResponse
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let tz = now.timezone();

        let daily: Vec<DailyView> = select_daily_summaries(
            &forecast.samples,
            &now,
            self.forecast.max_days,
            self.forecast.hour_window(),
        )
        .iter()
        .map(daily_view)
        .collect();

        let hourly = select_hourly_window(&forecast.samples, self.forecast.hourly_count)
            .map(|sample| hourly_point(sample, &tz))
            .collect();

        let current = &observation.sample;
        let wind = derive_wind_display(current);
        let particle_count = wind_particle_count(wind.speed_kmh);

        let sun = observation.sun.map(|window| {
            let progress = derive_sun_window(
                window.sunrise_utc,
                window.sunset_utc,
                now.timestamp(),
            );
            SunView {
                sunrise: window.sunrise_utc,
                sunset: window.sunset_utc,
                progress,
                arc: arc_position(progress.elapsed_fraction),
                brightness: sun_brightness(progress.elapsed_fraction),
            }
        });

        let air_quality = air_quality.map(|sample| AirQualityView {
            category: classify_aqi(sample.aqi),
            pollutants: pollutant_gauges(&sample),
        });

        DashboardResponse {
            location: LocationInfo {
                city: location.display_name,
                country: location.country_code,
                state: location.state,
                lat: location.lat,
                lon: location.lon,
                utc_offset_secs: observation.utc_offset_secs,
            },
            current: CurrentConditions {
                timestamp: current.timestamp_utc,
                temperature: current.temperature_c,
                feels_like: current.feels_like_c,
                condition: current.condition_main.clone(),
                description: current.condition_description.clone(),
                icon: map_condition_to_icon(&current.condition_main),
                humidity: current.humidity_pct.into(),
                pressure: current.pressure_hpa.into(),
                visibility_km: Reading::from(current.visibility_m).map(visibility_km),
            },
            wind: WindView {
                display: wind,
                particle_count,
            },
            sun,
            // The 2.5 endpoints carry no UV index
            uv: classify_uv(None),
            particles: particle_effect(&current.condition_main),
            air_quality,
            daily_empty: daily.is_empty(),
            daily,
            hourly,
        }
    }
}

fn daily_view(summary: &DailySummary) -> DailyView {
    let sample = &summary.sample;
    DailyView {
        date: summary.date.format("%Y-%m-%d").to_string(),
        weekday: summary.date.format("%a").to_string(),
        month_day: summary.date.format("%b %-d").to_string(),
        timestamp: sample.timestamp_utc,
        temperature: sample.temperature_c.round() as i64,
        description: sample.condition_description.clone(),
        icon: map_condition_to_icon(&sample.condition_main),
    }
}

fn hourly_point<Tz>(sample: &WeatherSample, tz: &Tz) -> HourlyPoint
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let label = DateTime::from_timestamp(sample.timestamp_utc, 0)
        .map(|instant| instant.with_timezone(tz).format("%I %p").to_string())
        .unwrap_or_default();

    HourlyPoint {
        timestamp: sample.timestamp_utc,
        label,
        temperature: sample.temperature_c.round() as i64,
        precipitation_pct: Reading::from(sample.precipitation_probability)
            .map(|p| (p * 100.0).round() as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Bytes;
    use chrono::NaiveDate;

    use crate::forecast::{ParticleEffect, SunWindow, UvLevel};
    use crate::openweather::MapTile;

    const NOW: i64 = 1715330000; // 2024-05-10 08:33:20 UTC

    struct StubProvider {
        known_city: bool,
        fail_forecast: bool,
        air_quality: Option<AirQualitySample>,
        utc_offset_secs: i32,
    }

    impl Default for StubProvider {
        fn default() -> Self {
            Self {
                known_city: true,
                fail_forecast: false,
                air_quality: Some(AirQualitySample {
                    aqi: 2,
                    pm2_5: 10.0,
                    pm10: 20.0,
                    o3: 60.0,
                    no2: 10.0,
                }),
                utc_offset_secs: 0,
            }
        }
    }

    fn sample(timestamp: i64, temp: f64, condition: &str) -> WeatherSample {
        WeatherSample {
            timestamp_utc: timestamp,
            temperature_c: temp,
            feels_like_c: temp - 1.0,
            condition_main: condition.to_string(),
            condition_description: format!("{} today", condition.to_lowercase()),
            wind_speed_ms: 5.0,
            wind_degree: Some(180.0),
            humidity_pct: Some(55.0),
            pressure_hpa: None,
            visibility_m: Some(9_800.0),
            precipitation_probability: Some(0.25),
        }
    }

    fn utc_ts(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().timestamp()
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn geocode(&self, query: &str) -> Result<Location, ProviderError> {
            if !self.known_city {
                return Err(ProviderError::CityNotFound(query.to_string()));
            }
            Ok(Location {
                lat: 8.54,
                lon: 39.27,
                display_name: "Adama".to_string(),
                country_code: "ET".to_string(),
                state: None,
            })
        }

        async fn fetch_current(&self, _location: &Location) -> Result<Observation, ProviderError> {
            Ok(Observation {
                sample: sample(NOW, 24.6, "Rain"),
                sun: Some(SunWindow::new(NOW - 3600, NOW + 3600)),
                utc_offset_secs: self.utc_offset_secs,
            })
        }

        async fn fetch_forecast(
            &self,
            _location: &Location,
        ) -> Result<ForecastSeries, ProviderError> {
            if self.fail_forecast {
                return Err(ProviderError::ApiError("HTTP 500 Internal Server Error".into()));
            }
            let start = utc_ts(2024, 5, 10, 9);
            let samples = (0..40)
                .map(|i| sample(start + i * 3 * 3600, i as f64, "Clouds"))
                .collect();
            Ok(ForecastSeries {
                samples,
                utc_offset_secs: self.utc_offset_secs,
            })
        }

        async fn fetch_air_quality(
            &self,
            _location: &Location,
        ) -> Result<Option<AirQualitySample>, ProviderError> {
            Ok(self.air_quality.clone())
        }

        async fn fetch_tile(&self, _tile: MapTile) -> Result<Bytes, ProviderError> {
            Err(ProviderError::ApiError("no tiles".into()))
        }
    }

    fn service(provider: StubProvider) -> DashboardService {
        DashboardService::new(Arc::new(provider), ForecastConfig::default(), None)
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(NOW, 0).unwrap()
    }

    #[tokio::test]
    async fn test_builds_full_dashboard() {
        let response = service(StubProvider::default())
            .build("Adama", now())
            .await
            .unwrap();

        assert_eq!(response.location.city, "Adama");
        assert_eq!(response.current.icon, "fas fa-cloud-rain");
        assert_eq!(response.current.visibility_km, Reading::Value(9.8));
        assert_eq!(response.current.pressure, Reading::Unavailable);
        assert_eq!(response.wind.display.compass_label, "S");
        assert_eq!(response.wind.display.speed_kmh, 18);
        assert_eq!(response.particles, Some(ParticleEffect::Rain));
        assert_eq!(response.uv, UvLevel::Unavailable);

        assert_eq!(response.daily.len(), 5);
        assert!(!response.daily_empty);
        assert_eq!(response.daily[0].date, "2024-05-11");
        assert_eq!(response.daily[0].weekday, "Sat");
        assert_eq!(response.daily[0].month_day, "May 11");

        assert_eq!(response.hourly.len(), 8);
        assert_eq!(response.hourly[0].label, "09 AM");
        assert_eq!(response.hourly[0].precipitation_pct, Reading::Value(25));

        let sun = response.sun.expect("sun window should be present");
        assert_eq!(sun.progress.elapsed_fraction, 0.5);
        assert_eq!(sun.arc, arc_position(0.5));
    }

    #[tokio::test]
    async fn test_daily_representative_uses_hour_window() {
        let response = service(StubProvider::default())
            .build("Adama", now())
            .await
            .unwrap();

        // Samples run 09:00, 12:00, ... UTC; for 2024-05-11 the 15:00 sample
        // is the last one inside 12..=15 and has index 10
        let expected_ts = utc_ts(2024, 5, 11, 15);
        assert_eq!(response.daily[0].timestamp, expected_ts);
        assert_eq!(response.daily[0].temperature, 10);
    }

    #[tokio::test]
    async fn test_buckets_with_location_offset() {
        let provider = StubProvider {
            utc_offset_secs: 3 * 3600,
            ..StubProvider::default()
        };
        let response = service(provider).build("Adama", now()).await.unwrap();

        // 12:00 UTC is 15:00 local, still inside the window; 15:00 UTC is not
        assert_eq!(response.daily[0].date, "2024-05-11");
        assert_eq!(response.daily[0].timestamp, utc_ts(2024, 5, 11, 12));
        assert_eq!(response.hourly[0].label, "12 PM");
    }

    #[tokio::test]
    async fn test_display_timezone_overrides_location_offset() {
        let service = DashboardService::new(
            Arc::new(StubProvider::default()),
            ForecastConfig::default(),
            Some(chrono_tz::Asia::Tokyo),
        );
        let response = service.build("Adama", now()).await.unwrap();

        // Tokyo is UTC+9: reference day is 2024-05-10 local
        let first = NaiveDate::parse_from_str(&response.daily[0].date, "%Y-%m-%d").unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 5, 11).unwrap());
        assert_eq!(response.daily[0].timestamp, utc_ts(2024, 5, 11, 6));
        assert_eq!(response.hourly[0].label, "06 PM");
    }

    #[tokio::test]
    async fn test_missing_air_quality_is_not_an_error() {
        let provider = StubProvider {
            air_quality: None,
            ..StubProvider::default()
        };
        let response = service(provider).build("Adama", now()).await.unwrap();
        assert!(response.air_quality.is_none());
    }

    #[tokio::test]
    async fn test_city_not_found() {
        let provider = StubProvider {
            known_city: false,
            ..StubProvider::default()
        };
        let err = service(provider).build("Atlantis", now()).await.unwrap_err();

        assert!(matches!(err, DashboardError::CityNotFound(ref c) if c == "Atlantis"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upstream_failure_aborts_pass() {
        let provider = StubProvider {
            fail_forecast: true,
            ..StubProvider::default()
        };
        let err = service(provider).build("Adama", now()).await.unwrap_err();

        assert!(matches!(err, DashboardError::UpstreamFailure(_)));
        assert_eq!(err.error_code(), Some("UPSTREAM_FAILURE"));
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let err = service(StubProvider::default())
            .build("   ", now())
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::MissingCity));
    }

    #[test]
    fn test_daily_and_hourly_round_alike() {
        let summary = DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 5, 11).unwrap(),
            sample: sample(utc_ts(2024, 5, 11, 12), 21.6, "Clear"),
        };

        let daily = daily_view(&summary);
        let hourly = hourly_point(&summary.sample, &Utc);

        assert_eq!(daily.temperature, 22);
        assert_eq!(daily.temperature, hourly.temperature);
    }

    #[test]
    fn test_missing_city_maps_to_bad_request() {
        let err = DashboardError::from(MissingCity);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), Some("MISSING_CITY"));
    }

    #[test]
    fn test_empty_forecast_renders_empty_state() {
        let service = service(StubProvider::default());
        let location = Location {
            lat: 0.0,
            lon: 0.0,
            display_name: "Nowhere".to_string(),
            country_code: String::new(),
            state: None,
        };
        let observation = Observation {
            sample: sample(NOW, 10.0, "Clear"),
            sun: None,
            utc_offset_secs: 0,
        };
        let forecast = ForecastSeries {
            samples: Vec::new(),
            utc_offset_secs: 0,
        };

        let response = service.assemble(location, observation, forecast, None, now());

        assert!(response.daily.is_empty());
        assert!(response.daily_empty);
        assert!(response.hourly.is_empty());
        assert!(response.sun.is_none());
        assert_eq!(response.particles, None);
    }
}
