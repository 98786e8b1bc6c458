//! Parse-and-validate boundary between the raw feed payload and `Reading`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::reading::feed::{GlucoseFeed, RawFeedPayload};
use crate::reading::models::Reading;
use crate::reading::trend::normalize_trend;
use crate::reading::FeedError;

const INVALID_GLUCOSE: &str = "Invalid glucose value received from API.";

/// Fetches once from `feed` and normalizes the result. Every call is a fresh fetch.
pub async fn acquire_reading(feed: &dyn GlucoseFeed) -> Result<Reading, FeedError> {
    let payload = feed.fetch().await?;
    let reading = normalize_payload(&payload, Utc::now())?;
    info!(
        "CGM reading acquired from {} feed: {} mg/dL ({:?}, {})",
        feed.name(),
        reading.glucose_value(),
        reading.status(),
        reading.trend()
    );
    Ok(reading)
}

/// Turns a raw payload into a canonical `Reading`.
///
/// `now` is used as the reading time when the payload carries no usable `time`.
pub fn normalize_payload(payload: &RawFeedPayload, now: DateTime<Utc>) -> Result<Reading, FeedError> {
    if let Some(message) = payload.error.as_ref().and_then(explicit_error) {
        error!("CGM feed reported an error: {message}");
        return Err(FeedError::Data(format!("API returned an error: {message}")));
    }

    let glucose_value = match payload.value.as_ref() {
        Some(value) => coerce_glucose(value).map_err(|e| {
            error!("Failed to parse glucose value from feed. Received: {payload:?}");
            e
        })?,
        None => {
            error!("Feed payload has no glucose value. Received: {payload:?}");
            return Err(FeedError::Data(INVALID_GLUCOSE.to_string()));
        }
    };

    let trend = normalize_trend(payload.trend.as_ref().and_then(Value::as_str));
    let timestamp = payload
        .time
        .as_ref()
        .and_then(parse_feed_time)
        .unwrap_or(now);

    Ok(Reading::new(glucose_value, trend, timestamp))
}

/// Accepts a JSON number or a string with a leading integer (`"140"`, `"140 mg/dL"`).
///
/// Strings keep only their leading optional sign and digits, so `"60.5"` is 60 and `"1e2"` is 1.
/// Fractional JSON numbers truncate toward zero the same way.
pub fn coerce_glucose(value: &Value) -> Result<i32, FeedError> {
    let number = match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|n| n.is_finite() && *n > i32::MIN as f64 - 1.0 && *n < i32::MAX as f64 + 1.0)
            .map(|n| n.trunc() as i32),
        Value::String(s) => leading_integer(s),
        _ => None,
    };

    number.ok_or_else(|| FeedError::Data(INVALID_GLUCOSE.to_string()))
}

/// Leading `[+-]?[0-9]+` of a string after surrounding whitespace, like a base-10 `parseInt`.
fn leading_integer(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    let signed = if negative { -magnitude } else { magnitude };
    i32::try_from(signed).ok()
}

/// Returns the feed's error message when the `error` field carries one.
/// `null`, `false` and empty strings do not count as an error.
fn explicit_error(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn parse_feed_time(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    // Offset-less ISO date-times are taken as UTC.
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    warn!("Unparseable reading time from feed: \"{raw}\". Using current time.");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::models::{GlucoseStatus, Trend};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn payload(value: Value) -> RawFeedPayload {
        serde_json::from_value(value).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_numeric_value_with_shorthand_trend() {
        let reading = normalize_payload(
            &payload(json!({"value": 140, "trend": "Flat", "time": "2025-03-01T08:30:00Z"})),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(reading.glucose_value(), 140);
        assert_eq!(reading.status(), GlucoseStatus::Ok);
        assert_eq!(reading.trend(), Trend::Steady);
        assert_eq!(reading.timestamp().to_rfc3339(), "2025-03-01T08:30:00+00:00");
    }

    #[test]
    fn test_numeric_string_value_is_accepted() {
        let reading =
            normalize_payload(&payload(json!({"value": " 55 ", "trend": "SingleDown"})), fixed_now())
                .unwrap();
        assert_eq!(reading.glucose_value(), 55);
        assert_eq!(reading.status(), GlucoseStatus::Low);
        assert_eq!(reading.trend(), Trend::Falling);
    }

    #[test]
    fn test_fractional_values_truncate() {
        assert_eq!(coerce_glucose(&json!(140.6)).unwrap(), 140);
        assert_eq!(coerce_glucose(&json!("99.9")).unwrap(), 99);
        assert_eq!(coerce_glucose(&json!(-0.5)).unwrap(), 0);
    }

    #[test]
    fn test_string_keeps_only_leading_integer() {
        assert_eq!(coerce_glucose(&json!("140 mg/dL")).unwrap(), 140);
        assert_eq!(coerce_glucose(&json!("1e2")).unwrap(), 1);
        assert_eq!(coerce_glucose(&json!("+85")).unwrap(), 85);
        assert_eq!(coerce_glucose(&json!("-12abc")).unwrap(), -12);
        assert_eq!(coerce_glucose(&json!("  \t72\n")).unwrap(), 72);
    }

    #[test]
    fn test_fractional_strings_do_not_cross_thresholds() {
        let low = normalize_payload(&payload(json!({"value": "60.5"})), fixed_now()).unwrap();
        assert_eq!(low.glucose_value(), 60);
        assert_eq!(low.status(), GlucoseStatus::Low);

        let ok = normalize_payload(&payload(json!({"value": "249.9"})), fixed_now()).unwrap();
        assert_eq!(ok.glucose_value(), 249);
        assert_eq!(ok.status(), GlucoseStatus::Ok);
    }

    #[test]
    fn test_string_out_of_range_is_rejected() {
        let err = coerce_glucose(&json!("99999999999")).unwrap_err();
        assert!(matches!(err, FeedError::Data(_)));
    }

    #[test]
    fn test_unparseable_values_are_data_errors() {
        for bad in [json!("abc"), json!(""), json!(true), json!([140]), json!({"mg": 140}), json!("NaN")] {
            let err = coerce_glucose(&bad).unwrap_err();
            assert!(matches!(err, FeedError::Data(_)), "value {bad}");
        }
    }

    #[test]
    fn test_missing_or_null_value_is_data_error() {
        let missing = normalize_payload(&payload(json!({"trend": "Flat"})), fixed_now());
        let null = normalize_payload(&payload(json!({"value": null, "trend": "Flat"})), fixed_now());
        assert!(matches!(missing, Err(FeedError::Data(_))));
        assert!(matches!(null, Err(FeedError::Data(_))));
    }

    #[test]
    fn test_explicit_error_field_fails_even_with_value() {
        let err = normalize_payload(
            &payload(json!({"value": 140, "trend": "Flat", "error": "session expired"})),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, FeedError::Data("API returned an error: session expired".to_string()));
    }

    #[test]
    fn test_falsy_error_field_is_ignored() {
        for error in [json!(null), json!(false), json!("")] {
            let reading =
                normalize_payload(&payload(json!({"value": 100, "error": error})), fixed_now());
            assert!(reading.is_ok());
        }
    }

    #[test]
    fn test_missing_or_garbled_trend_defaults_to_steady() {
        let no_trend = normalize_payload(&payload(json!({"value": 100})), fixed_now()).unwrap();
        let numeric_trend =
            normalize_payload(&payload(json!({"value": 100, "trend": 4})), fixed_now()).unwrap();
        assert_eq!(no_trend.trend(), Trend::Steady);
        assert_eq!(numeric_trend.trend(), Trend::Steady);
    }

    #[test]
    fn test_missing_time_uses_now() {
        let reading = normalize_payload(&payload(json!({"value": 100})), fixed_now()).unwrap();
        assert_eq!(reading.timestamp(), fixed_now());
    }

    #[test]
    fn test_unparseable_time_uses_now() {
        let reading =
            normalize_payload(&payload(json!({"value": 100, "time": "yesterday"})), fixed_now())
                .unwrap();
        assert_eq!(reading.timestamp(), fixed_now());
    }

    #[test]
    fn test_offset_and_naive_times_are_parsed() {
        let offset =
            normalize_payload(&payload(json!({"value": 100, "time": "2025-03-01T09:30:00+01:00"})), fixed_now())
                .unwrap();
        let naive =
            normalize_payload(&payload(json!({"value": 100, "time": "2025-03-01T08:30:00"})), fixed_now())
                .unwrap();
        assert_eq!(offset.timestamp(), naive.timestamp());
        assert_eq!(naive.timestamp().to_rfc3339(), "2025-03-01T08:30:00+00:00");
    }

    struct CountingFeed {
        calls: AtomicUsize,
        payload: RawFeedPayload,
    }

    #[async_trait]
    impl GlucoseFeed for CountingFeed {
        async fn fetch(&self) -> Result<RawFeedPayload, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_acquire_reading_fetches_every_time() {
        let feed = CountingFeed {
            calls: AtomicUsize::new(0),
            payload: payload(json!({"value": 120, "trend": "FortyFiveUp"})),
        };

        let first = acquire_reading(&feed).await.unwrap();
        let second = acquire_reading(&feed).await.unwrap();

        assert_eq!(feed.calls.load(Ordering::SeqCst), 2);
        assert_eq!(first.glucose_value(), 120);
        assert_eq!(second.trend(), Trend::RisingSlightly);
    }

    struct DownFeed;

    #[async_trait]
    impl GlucoseFeed for DownFeed {
        async fn fetch(&self) -> Result<RawFeedPayload, FeedError> {
            Err(FeedError::Fetch("API request failed with status 500: boom".to_string()))
        }

        fn name(&self) -> &'static str {
            "down"
        }
    }

    #[tokio::test]
    async fn test_acquire_reading_propagates_fetch_error() {
        let err = acquire_reading(&DownFeed).await.unwrap_err();
        assert!(matches!(err, FeedError::Fetch(_)));
    }
}
