use tracing::warn;

use crate::reading::models::Trend;

/// Maps raw upstream trend vocabulary onto the seven canonical trends.
///
/// Accepts the canonical phrases themselves (any case) and the Dexcom shorthand codes
/// (`DoubleUp`, `SingleUp`, `FortyFiveUp`, `Flat`, `FortyFiveDown`, `SingleDown`,
/// `DoubleDown`). Anything else, including a missing or empty value, becomes `Steady`.
pub fn normalize_trend(raw: Option<&str>) -> Trend {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => {
            warn!("Received empty trend value. Defaulting to 'steady'.");
            return Trend::Steady;
        }
    };

    let lowered = raw.to_lowercase();

    if let Some(canonical) = Trend::ALL.iter().find(|t| t.as_str() == lowered) {
        return *canonical;
    }

    match lowered.as_str() {
        "doubleup" => Trend::RisingQuickly,
        "singleup" => Trend::Rising,
        "fortyfiveup" => Trend::RisingSlightly,
        "flat" => Trend::Steady,
        "fortyfivedown" => Trend::FallingSlightly,
        "singledown" => Trend::Falling,
        "doubledown" => Trend::FallingQuickly,
        _ => {
            warn!("Unknown trend value received from feed: \"{raw}\". Defaulting to 'steady'.");
            Trend::Steady
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_values_map_to_themselves() {
        for trend in Trend::ALL {
            assert_eq!(normalize_trend(Some(trend.as_str())), trend);
        }
    }

    #[test]
    fn test_canonical_values_are_case_insensitive() {
        assert_eq!(normalize_trend(Some("Rising Quickly")), Trend::RisingQuickly);
        assert_eq!(normalize_trend(Some("FALLING")), Trend::Falling);
    }

    #[test]
    fn test_shorthand_codes_map_to_canonical() {
        let cases = [
            ("DoubleUp", Trend::RisingQuickly),
            ("SingleUp", Trend::Rising),
            ("FortyFiveUp", Trend::RisingSlightly),
            ("Flat", Trend::Steady),
            ("FortyFiveDown", Trend::FallingSlightly),
            ("SingleDown", Trend::Falling),
            ("DoubleDown", Trend::FallingQuickly),
        ];
        for (code, expected) in cases {
            assert_eq!(normalize_trend(Some(code)), expected, "code {code}");
        }
    }

    #[test]
    fn test_unknown_and_empty_default_to_steady() {
        assert_eq!(normalize_trend(None), Trend::Steady);
        assert_eq!(normalize_trend(Some("")), Trend::Steady);
        assert_eq!(normalize_trend(Some("   ")), Trend::Steady);
        assert_eq!(normalize_trend(Some("NotComputable")), Trend::Steady);
        assert_eq!(normalize_trend(Some("RateOutOfRange")), Trend::Steady);
        assert_eq!(normalize_trend(Some("sideways")), Trend::Steady);
    }

    #[test]
    fn test_output_is_always_canonical() {
        let inputs = ["doubleup", "x", "rising", "Flat", "", "42", "falling  quickly"];
        for input in inputs {
            assert!(Trend::ALL.contains(&normalize_trend(Some(input))));
        }
    }
}
