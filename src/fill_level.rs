//! Fill-level derivation from ultrasonic distance readings.
//!
//! The sensor sits on the lid and measures the distance down to the
//! contents, so a smaller distance means a fuller container. Every read path
//! goes through [`evaluate`] so the snapshot, history and stats views always
//! agree on a given raw reading.

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Inner height of a container, in centimeters.
pub const CONTAINER_HEIGHT_CM: f64 = 30.0;

/// Fill percentage above which a container is `High`.
pub const HIGH_THRESHOLD_PERCENT: f64 = 70.0;

/// Fill percentage above which a container is `Medium`.
pub const MEDIUM_THRESHOLD_PERCENT: f64 = 30.0;

/// Coarse fill tier used for dashboard colouring and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum FillStatus {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillLevel {
    /// Unrounded, clamped to `0..=100`.
    pub percent: f64,
    pub status: FillStatus,
}

/// Convert a distance (cm) into a fill percentage clamped to `0..=100`.
pub fn fill_percent(distance_cm: f64) -> f64 {
    let percent = ((CONTAINER_HEIGHT_CM - distance_cm) / CONTAINER_HEIGHT_CM) * 100.0;
    percent.clamp(0.0, 100.0)
}

/// Bucket a fill percentage. Both boundaries are strict `>`, so exactly 70
/// is `Medium` and exactly 30 is `Low`.
pub fn classify(percent: f64) -> FillStatus {
    if percent > HIGH_THRESHOLD_PERCENT {
        FillStatus::High
    } else if percent > MEDIUM_THRESHOLD_PERCENT {
        FillStatus::Medium
    } else {
        FillStatus::Low
    }
}

pub fn evaluate(distance_cm: f64) -> FillLevel {
    let percent = fill_percent(distance_cm);
    FillLevel {
        percent,
        status: classify(percent),
    }
}

/// Round to `places` decimals for display. Works on the exact binary value
/// of `value` and sends ties to the even digit, so `22.45` (stored just
/// below the tie) becomes `22.4` and `62.5` becomes `62`.
pub fn round_to(value: f64, places: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_distance_is_full() {
        for d in [0.0, -0.1, -5.0, -1000.0] {
            let level = evaluate(d);
            assert_eq!(level.percent, 100.0, "distance {d}");
            assert_eq!(level.status, FillStatus::High, "distance {d}");
        }
    }

    #[test]
    fn distance_at_or_beyond_height_is_empty() {
        for d in [30.0, 30.5, 45.0, 400.0] {
            let level = evaluate(d);
            assert_eq!(level.percent, 0.0, "distance {d}");
            assert_eq!(level.status, FillStatus::Low, "distance {d}");
        }
    }

    #[test]
    fn exactly_seventy_percent_is_medium() {
        let level = evaluate(9.0);
        assert_eq!(level.percent, 70.0);
        assert_eq!(level.status, FillStatus::Medium);
    }

    #[test]
    fn just_above_seventy_percent_is_high() {
        let level = evaluate(8.9999);
        assert!(level.percent > 70.0);
        assert!((level.percent - 70.0003).abs() < 1e-3);
        assert_eq!(level.status, FillStatus::High);
    }

    #[test]
    fn exactly_thirty_percent_is_low() {
        assert_eq!(classify(30.0), FillStatus::Low);
        assert_eq!(classify(30.0001), FillStatus::Medium);
    }

    #[test]
    fn half_full_container() {
        let level = evaluate(15.0);
        assert_eq!(level.percent, 50.0);
        assert_eq!(level.status, FillStatus::Medium);
    }

    #[test]
    fn fill_percent_is_monotone_in_distance() {
        let distances: Vec<f64> = (-20..=80).map(|d| d as f64 * 0.5).collect();
        for pair in distances.windows(2) {
            assert!(
                fill_percent(pair[0]) >= fill_percent(pair[1]),
                "fill({}) < fill({})",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn classification_uses_unrounded_percent() {
        // 70.4 rounds to 70 for display but is still above the boundary.
        let distance = CONTAINER_HEIGHT_CM * (1.0 - 0.704);
        let level = evaluate(distance);
        assert_eq!(round_to(level.percent, 0), 70.0);
        assert_eq!(level.status, FillStatus::High);
    }

    #[test]
    fn fleet_example_buckets() {
        let statuses: Vec<_> = [5.0, 20.0, 28.0].into_iter().map(|d| evaluate(d).status).collect();
        assert_eq!(statuses, vec![FillStatus::High, FillStatus::Medium, FillStatus::Low]);
        assert_eq!(round_to(fill_percent(5.0), 0), 83.0);
        assert_eq!(round_to(fill_percent(20.0), 0), 33.0);
        assert_eq!(round_to(fill_percent(28.0), 0), 7.0);
    }

    #[test]
    fn round_to_one_decimal() {
        assert_eq!(round_to(22.46, 1), 22.5);
        assert_eq!(round_to(55.24, 1), 55.2);
        assert_eq!(round_to(-3.25, 0), -3.0);
    }

    #[test]
    fn round_to_sends_ties_to_even() {
        assert_eq!(round_to(62.5, 0), 62.0);
        assert_eq!(round_to(63.5, 0), 64.0);
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_to(0.25, 1), 0.2);
        assert_eq!(round_to(0.75, 1), 0.8);
    }

    #[test]
    fn round_to_uses_exact_binary_value() {
        // 22.45 and 2.675 are stored slightly below the tie.
        assert_eq!(round_to(22.45, 1), 22.4);
        assert_eq!(round_to(0.35, 1), 0.3);
        assert_eq!(round_to(2.675, 2), 2.67);
    }

    #[test]
    fn half_tie_fill_percent_displays_even() {
        let level = evaluate(11.25);
        assert_eq!(level.percent, 62.5);
        assert_eq!(level.status, FillStatus::Medium);
        assert_eq!(round_to(level.percent, 0), 62.0);
    }

    #[test]
    fn round_to_passes_non_finite_through() {
        assert!(round_to(f64::NAN, 1).is_nan());
        assert_eq!(round_to(f64::INFINITY, 0), f64::INFINITY);
    }
}
