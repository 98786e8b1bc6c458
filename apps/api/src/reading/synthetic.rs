//! Synthetic glucose feed for demos and local development.
//!
//! Simulates 24 hours of readings at 5-minute spacing: a random walk starting at
//! 120 mg/dL, nudged upward around meal hours and downward during deep sleep, kept
//! inside 60–250 mg/dL. The newest point is served as a raw payload so it goes through
//! the same normalization path as live data.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, Timelike, Utc};
use rand::Rng;
use serde::Serialize;
use serde_json::json;

use crate::reading::feed::{GlucoseFeed, RawFeedPayload};
use crate::reading::FeedError;

const POINTS_PER_HOUR: i64 = 12;
const STEP_MINUTES: i64 = 5;
const START_VALUE: f64 = 120.0;
const MEAL_HOURS: [u32; 3] = [8, 13, 19];
const FLOOR: f64 = 60.0;
const CEILING: f64 = 250.0;

/// One point of the simulated CGM trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub time: DateTime<Utc>,
    pub value: i32,
}

/// Generates the last 24 hours of simulated readings, oldest first, ending at `now`.
pub fn generate_series<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Vec<SeriesPoint> {
    let steps = 24 * POINTS_PER_HOUR;
    let mut current = START_VALUE;
    let mut points = Vec::with_capacity(steps as usize + 1);

    for i in (0..=steps).rev() {
        let time = now - Duration::minutes(i * STEP_MINUTES);
        let hour = time.with_timezone(&Local).hour();

        let mut change = (rng.gen::<f64>() - 0.5) * 5.0;
        if MEAL_HOURS.contains(&hour) {
            change += rng.gen::<f64>() * 5.0;
        }
        if (2..=5).contains(&hour) {
            change -= rng.gen::<f64>() * 3.0;
        }

        current += change;

        if current < FLOOR {
            current = FLOOR + rng.gen::<f64>() * 5.0;
        }
        if current > CEILING {
            current = CEILING - rng.gen::<f64>() * 10.0;
        }

        points.push(SeriesPoint {
            time,
            value: current.round() as i32,
        });
    }

    points
}

/// Dexcom shorthand for a rate of change in mg/dL per minute.
pub fn trend_code_for_rate(mg_dl_per_min: f64) -> &'static str {
    if mg_dl_per_min >= 3.0 {
        "DoubleUp"
    } else if mg_dl_per_min >= 2.0 {
        "SingleUp"
    } else if mg_dl_per_min >= 1.0 {
        "FortyFiveUp"
    } else if mg_dl_per_min > -1.0 {
        "Flat"
    } else if mg_dl_per_min > -2.0 {
        "FortyFiveDown"
    } else if mg_dl_per_min > -3.0 {
        "SingleDown"
    } else {
        "DoubleDown"
    }
}

/// Builds the raw payload a live feed would have returned for the newest point.
pub fn payload_from_series(series: &[SeriesPoint]) -> Option<RawFeedPayload> {
    let latest = series.last()?;
    let rate = match series.len() {
        0 | 1 => 0.0,
        n => (latest.value - series[n - 2].value) as f64 / STEP_MINUTES as f64,
    };

    Some(RawFeedPayload {
        value: Some(json!(latest.value)),
        trend: Some(json!(trend_code_for_rate(rate))),
        time: Some(json!(latest.time.to_rfc3339())),
        error: None,
    })
}

/// Feed implementation backed by `generate_series`. Selected with `CGM_FEED_MODE=synthetic`.
#[derive(Debug, Clone, Default)]
pub struct SyntheticFeed;

impl SyntheticFeed {
    pub fn new() -> Self {
        Self
    }

    fn sample(&self) -> Result<RawFeedPayload, FeedError> {
        let series = generate_series(Utc::now(), &mut rand::thread_rng());
        payload_from_series(&series)
            .ok_or_else(|| FeedError::Data("Synthetic feed produced no readings.".to_string()))
    }
}

#[async_trait]
impl GlucoseFeed for SyntheticFeed {
    async fn fetch(&self) -> Result<RawFeedPayload, FeedError> {
        self.sample()
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}
