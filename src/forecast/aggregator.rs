use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Timelike};

use super::models::{DailySummary, WeatherSample};

/// Local hours (inclusive on both ends) a daily representative should fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.start..=self.end).contains(&hour)
    }
}

impl Default for HourWindow {
    fn default() -> Self {
        Self::new(12, 15)
    }
}

/// Pick one representative sample per calendar day after the reference day.
///
/// Samples are bucketed by their wall-clock date in `reference`'s time zone.
/// Within a day, the last sample whose local hour lies in `window` wins;
/// a day with no such sample keeps its first sample. At most `max_days`
/// summaries are returned, in ascending date order.
pub fn select_daily_summaries<Tz: TimeZone>(
    samples: &[WeatherSample],
    reference: &DateTime<Tz>,
    max_days: usize,
    window: HourWindow,
) -> Vec<DailySummary> {
    let tz = reference.timezone();
    let today = reference.date_naive();

    // Upstream orders by time, but bucketing must not depend on it
    let mut ordered: Vec<&WeatherSample> = samples.iter().collect();
    ordered.sort_by_key(|s| s.timestamp_utc);

    let mut days: BTreeMap<NaiveDate, &WeatherSample> = BTreeMap::new();

    for sample in ordered {
        let Some(instant) = DateTime::from_timestamp(sample.timestamp_utc, 0) else {
            tracing::warn!(
                timestamp = sample.timestamp_utc,
                "Skipping sample with out-of-range timestamp"
            );
            continue;
        };
        let local = instant.with_timezone(&tz);
        let date = local.date_naive();

        if date <= today {
            continue;
        }

        match days.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(sample);
            }
            Entry::Occupied(mut slot) => {
                if window.contains(local.hour()) {
                    slot.insert(sample);
                }
            }
        }
    }

    days.into_iter()
        .take(max_days)
        .map(|(date, sample)| DailySummary {
            date,
            sample: sample.clone(),
        })
        .collect()
}

/// The first `count` samples, unfiltered, for short-term charting.
pub fn select_hourly_window(
    samples: &[WeatherSample],
    count: usize,
) -> impl Iterator<Item = &WeatherSample> + '_ {
    samples.iter().take(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn sample_at(timestamp: i64, temp: f64) -> WeatherSample {
        WeatherSample {
            timestamp_utc: timestamp,
            temperature_c: temp,
            feels_like_c: temp,
            condition_main: "Clouds".to_string(),
            condition_description: "scattered clouds".to_string(),
            wind_speed_ms: 3.0,
            wind_degree: Some(90.0),
            humidity_pct: Some(60.0),
            pressure_hpa: Some(1012.0),
            visibility_m: Some(10000.0),
            precipitation_probability: Some(0.1),
        }
    }

    fn utc_ts(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().timestamp()
    }

    /// Three-hourly samples starting at `start_ts`, temperature = index
    fn three_hourly(start_ts: i64, count: usize) -> Vec<WeatherSample> {
        (0..count)
            .map(|i| sample_at(start_ts + i as i64 * 3 * 3600, i as f64))
            .collect()
    }

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_empty_input_returns_empty() {
        let result = select_daily_summaries(&[], &reference(), 5, HourWindow::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_dates_strictly_increasing_and_unique() {
        let samples = three_hourly(utc_ts(2024, 5, 10, 9), 40);
        let result = select_daily_summaries(&samples, &reference(), 5, HourWindow::default());

        assert_eq!(result.len(), 5);
        for pair in result.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_excludes_reference_day_and_earlier() {
        let mut samples = vec![
            sample_at(utc_ts(2024, 5, 9, 13), 1.0),
            sample_at(utc_ts(2024, 5, 10, 13), 2.0),
            sample_at(utc_ts(2024, 5, 10, 23), 3.0),
        ];
        samples.push(sample_at(utc_ts(2024, 5, 11, 0), 4.0));

        let result = select_daily_summaries(&samples, &reference(), 5, HourWindow::default());
        let today = reference().date_naive();

        assert_eq!(result.len(), 1);
        assert!(result.iter().all(|s| s.date > today));
        assert_eq!(result[0].sample.temperature_c, 4.0);
    }

    #[test]
    fn test_in_window_sample_wins() {
        let samples = vec![
            sample_at(utc_ts(2024, 5, 11, 0), 0.0),
            sample_at(utc_ts(2024, 5, 11, 6), 6.0),
            sample_at(utc_ts(2024, 5, 11, 13), 13.0),
            sample_at(utc_ts(2024, 5, 11, 18), 18.0),
            sample_at(utc_ts(2024, 5, 11, 21), 21.0),
        ];

        let result = select_daily_summaries(&samples, &reference(), 5, HourWindow::default());

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sample.temperature_c, 13.0);
    }

    #[test]
    fn test_last_in_window_sample_overrides_earlier() {
        let samples = vec![
            sample_at(utc_ts(2024, 5, 11, 9), 9.0),
            sample_at(utc_ts(2024, 5, 11, 12), 12.0),
            sample_at(utc_ts(2024, 5, 11, 15), 15.0),
            sample_at(utc_ts(2024, 5, 11, 18), 18.0),
        ];

        let result = select_daily_summaries(&samples, &reference(), 5, HourWindow::default());
        assert_eq!(result[0].sample.temperature_c, 15.0);
    }

    #[test]
    fn test_noon_only_window() {
        let samples = vec![
            sample_at(utc_ts(2024, 5, 11, 12), 12.0),
            sample_at(utc_ts(2024, 5, 11, 15), 15.0),
        ];

        let result = select_daily_summaries(&samples, &reference(), 5, HourWindow::new(12, 12));
        assert_eq!(result[0].sample.temperature_c, 12.0);
    }

    #[test]
    fn test_first_sample_kept_without_window_match() {
        let samples = vec![
            sample_at(utc_ts(2024, 5, 11, 0), 0.0),
            sample_at(utc_ts(2024, 5, 11, 3), 3.0),
            sample_at(utc_ts(2024, 5, 11, 18), 18.0),
        ];

        let result = select_daily_summaries(&samples, &reference(), 5, HourWindow::default());
        assert_eq!(result[0].sample.temperature_c, 0.0);
    }

    #[test]
    fn test_out_of_order_input_matches_sorted() {
        let sorted = three_hourly(utc_ts(2024, 5, 10, 9), 40);
        let mut shuffled = sorted.clone();
        shuffled.reverse();
        shuffled.swap(3, 17);

        let expected = select_daily_summaries(&sorted, &reference(), 5, HourWindow::default());
        let actual = select_daily_summaries(&shuffled, &reference(), 5, HourWindow::default());

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_truncates_to_max_days() {
        let samples = three_hourly(utc_ts(2024, 5, 10, 9), 40);

        let result = select_daily_summaries(&samples, &reference(), 2, HourWindow::default());
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].date, NaiveDate::from_ymd_opt(2024, 5, 11).unwrap());
        assert_eq!(result[1].date, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
    }

    #[test]
    fn test_buckets_in_reference_time_zone() {
        // UTC+9: 2024-05-11 03:00 UTC is 12:00 local on the 11th,
        // 2024-05-10 18:00 UTC is already 03:00 local on the 11th
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let reference = tz.with_ymd_and_hms(2024, 5, 10, 10, 0, 0).unwrap();

        let samples = vec![
            sample_at(utc_ts(2024, 5, 10, 18), 3.0),
            sample_at(utc_ts(2024, 5, 11, 3), 12.0),
            sample_at(utc_ts(2024, 5, 11, 9), 18.0),
        ];

        let result = select_daily_summaries(&samples, &reference, 5, HourWindow::default());

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].date, NaiveDate::from_ymd_opt(2024, 5, 11).unwrap());
        assert_eq!(result[0].sample.temperature_c, 12.0);
    }

    #[test]
    fn test_hourly_window_takes_first_samples() {
        let samples = three_hourly(utc_ts(2024, 5, 10, 9), 10);

        let window: Vec<_> = select_hourly_window(&samples, 8).collect();
        assert_eq!(window.len(), 8);
        assert_eq!(window[0], &samples[0]);
        assert_eq!(window[7], &samples[7]);
    }

    #[test]
    fn test_hourly_window_shorter_input() {
        let samples = three_hourly(utc_ts(2024, 5, 10, 9), 3);
        assert_eq!(select_hourly_window(&samples, 8).count(), 3);
    }
}
