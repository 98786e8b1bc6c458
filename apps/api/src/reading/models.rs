use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Readings at or below this value (mg/dL) are `Low`.
pub const LOW_THRESHOLD_MG_DL: i32 = 60;
/// Readings at or above this value (mg/dL) are `High`.
pub const HIGH_THRESHOLD_MG_DL: i32 = 250;

/// Clinical status band of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GlucoseStatus {
    Low,
    Ok,
    High,
}

impl GlucoseStatus {
    /// Both thresholds are inclusive. Out-of-band values are classified, never rejected.
    pub fn classify(glucose_value: i32) -> Self {
        if glucose_value <= LOW_THRESHOLD_MG_DL {
            GlucoseStatus::Low
        } else if glucose_value >= HIGH_THRESHOLD_MG_DL {
            GlucoseStatus::High
        } else {
            GlucoseStatus::Ok
        }
    }
}

/// Rate and direction of glucose change at the time of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Trend {
    #[serde(rename = "rising quickly")]
    RisingQuickly,
    #[serde(rename = "rising")]
    Rising,
    #[serde(rename = "rising slightly")]
    RisingSlightly,
    #[serde(rename = "steady")]
    Steady,
    #[serde(rename = "falling slightly")]
    FallingSlightly,
    #[serde(rename = "falling")]
    Falling,
    #[serde(rename = "falling quickly")]
    FallingQuickly,
}

impl Trend {
    pub const ALL: [Trend; 7] = [
        Trend::RisingQuickly,
        Trend::Rising,
        Trend::RisingSlightly,
        Trend::Steady,
        Trend::FallingSlightly,
        Trend::Falling,
        Trend::FallingQuickly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Trend::RisingQuickly => "rising quickly",
            Trend::Rising => "rising",
            Trend::RisingSlightly => "rising slightly",
            Trend::Steady => "steady",
            Trend::FallingSlightly => "falling slightly",
            Trend::Falling => "falling",
            Trend::FallingQuickly => "falling quickly",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical CGM reading. Built fresh per fetch and never mutated.
///
/// `status` has no setter and no constructor argument: it is always derived from
/// `glucose_value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    glucose_value: i32,
    status: GlucoseStatus,
    trend: Trend,
    timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn new(glucose_value: i32, trend: Trend, timestamp: DateTime<Utc>) -> Self {
        Self {
            glucose_value,
            status: GlucoseStatus::classify(glucose_value),
            trend,
            timestamp,
        }
    }

    pub fn glucose_value(&self) -> i32 {
        self.glucose_value
    }

    pub fn status(&self) -> GlucoseStatus {
        self.status
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
