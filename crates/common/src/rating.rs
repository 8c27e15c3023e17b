//! Rating scale arithmetic.
//!
//! Clients rate on a 1-5 star scale. Aggregates are stored as integers on a
//! 0-100 scale (mean x 20) so that one decimal of precision survives in an
//! integer column. Rounding is half away from zero and is done in integer
//! arithmetic.

use std::fmt;

use serde::Serialize;

/// Lowest accepted rating.
pub const MIN_RATING: i32 = 1;

/// Highest accepted rating.
pub const MAX_RATING: i32 = 5;

/// Factor between the star scale and the stored scale.
pub const SCALE_FACTOR: i32 = 20;

/// `round(mean(values) * 20)`, or 0 for no values.
#[must_use]
pub fn scaled_average(values: &[i32]) -> i32 {
    if values.is_empty() {
        return 0;
    }
    let sum: i64 = values.iter().map(|v| i64::from(*v)).sum();
    let count = values.len() as i64;
    let scaled = sum * i64::from(SCALE_FACTOR);

    // Half away from zero: (2x + n) / 2n for x >= 0, mirrored below zero.
    let rounded = if scaled >= 0 {
        (2 * scaled + count) / (2 * count)
    } else {
        -((-2 * scaled + count) / (2 * count))
    };
    rounded as i32
}

/// A value on the stored 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct ScaledRating(pub i32);

impl ScaledRating {
    /// Whole stars, `round(stored / 20)`.
    #[must_use]
    pub const fn stars(self) -> i32 {
        (self.0 + SCALE_FACTOR / 2) / SCALE_FACTOR
    }

    /// Stars with one decimal place, `stored / 20`.
    #[must_use]
    pub fn as_decimal(self) -> f64 {
        (f64::from(self.0) / f64::from(SCALE_FACTOR) * 10.0).round() / 10.0
    }
}

impl fmt::Display for ScaledRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}/5", self.as_decimal())
    }
}

/// Average and count over a set of ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// Mean rating on the 0-100 scale.
    pub average_rating: i32,
    /// Number of ratings.
    pub rating_count: i32,
}

impl RatingSummary {
    /// Summarise star ratings.
    #[must_use]
    pub fn from_values(values: &[i32]) -> Self {
        Self {
            average_rating: scaled_average(values),
            rating_count: values.len() as i32,
        }
    }

    /// The average as a [`ScaledRating`].
    #[must_use]
    pub const fn scaled(&self) -> ScaledRating {
        ScaledRating(self.average_rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(scaled_average(&[]), 0);
        assert_eq!(RatingSummary::from_values(&[]), RatingSummary::default());
    }

    #[test]
    fn test_single_values() {
        assert_eq!(scaled_average(&[5]), 100);
        assert_eq!(scaled_average(&[1]), 20);
    }

    #[test]
    fn test_mean_of_five_and_three() {
        let summary = RatingSummary::from_values(&[5, 3]);
        assert_eq!(summary.average_rating, 80);
        assert_eq!(summary.rating_count, 2);
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        // mean 4/3 * 20 = 26.67
        assert_eq!(scaled_average(&[1, 1, 2]), 27);
        // mean 13/8 * 20 = 32.5
        assert_eq!(scaled_average(&[1, 1, 1, 2, 2, 2, 2, 2]), 33);
        // mean 7/3 * 20 = 46.67
        assert_eq!(scaled_average(&[2, 2, 3]), 47);
    }

    #[test]
    fn test_matches_float_reference() {
        let sets: [&[i32]; 5] = [&[1, 2], &[4, 4, 5], &[3, 5, 5, 1], &[2; 7], &[5, 4, 3, 2, 1, 1]];
        for values in sets {
            let mean = f64::from(values.iter().sum::<i32>()) / values.len() as f64;
            let expected = (mean * 20.0).round() as i32;
            assert!((scaled_average(values) - expected).abs() <= 1);
        }
    }

    #[test]
    fn test_display_conversions() {
        assert_eq!(ScaledRating(80).stars(), 4);
        assert_eq!(ScaledRating(90).stars(), 5);
        assert_eq!(ScaledRating(89).stars(), 4);
        assert_eq!(ScaledRating(0).stars(), 0);
        assert_eq!(ScaledRating(86).as_decimal(), 4.3);
        assert_eq!(ScaledRating(90).as_decimal(), 4.5);
        assert_eq!(ScaledRating(100).to_string(), "5.0/5");
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let json = serde_json::to_value(RatingSummary::from_values(&[5])).unwrap_or_default();
        assert_eq!(json["averageRating"], 100);
        assert_eq!(json["ratingCount"], 1);
    }
}
