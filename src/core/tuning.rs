//! Business tuning constants for the compatibility scorer.
//!
//! Step tables are `(upper_bound_exclusive, score)` pairs checked in order;
//! values at or above the last bound get the matching `*_TOP` score.

/// Candidates scoring at or below this are dropped from rankings
pub const MIN_RELEVANCE_SCORE: f64 = 0.3;
pub const DEFAULT_RESULT_LIMIT: usize = 20;

// Neutral defaults used when data is missing or a lookup fails
pub const NEUTRAL_CATEGORY_SCORE: f64 = 0.3;
pub const NEUTRAL_BUDGET_SCORE: f64 = 0.5;
pub const NEUTRAL_HISTORY_SCORE: f64 = 0.5;
pub const NEUTRAL_AVAILABILITY_SCORE: f64 = 0.7;
/// Rating component when placements exist but none were rated
pub const NEUTRAL_RATING_SCORE: f64 = 0.5;

/// ASCII keywords up to this length only match as whole words
pub const SHORT_KEYWORD_MAX_LEN: usize = 3;

/// Engagement rate (%) assumed for channels without recent statistics
pub const DEFAULT_ENGAGEMENT_RATE: f64 = 3.0;

// Budget: ratio of channel price to offer budget
pub const BUDGET_RATIO_CHEAP: f64 = 0.05;
pub const BUDGET_RATIO_OPTIMAL_MAX: f64 = 0.30;
pub const BUDGET_RATIO_ACCEPTABLE_MAX: f64 = 0.50;
pub const BUDGET_SCORE_CHEAP: f64 = 0.8;
pub const BUDGET_SCORE_OPTIMAL: f64 = 1.0;
pub const BUDGET_SCORE_ACCEPTABLE: f64 = 0.6;
pub const BUDGET_SCORE_EXPENSIVE: f64 = 0.2;

// Audience quality
pub const SUBSCRIBER_STEPS: [(u64, f64); 4] =
    [(1_000, 0.3), (5_000, 0.5), (20_000, 0.7), (100_000, 0.9)];
pub const SUBSCRIBER_TOP: f64 = 1.0;
pub const ENGAGEMENT_STEPS: [(f64, f64); 4] = [(1.0, 0.2), (3.0, 0.5), (5.0, 0.7), (10.0, 0.9)];
pub const ENGAGEMENT_TOP: f64 = 1.0;
pub const AUDIENCE_SIZE_WEIGHT: f64 = 0.4;
pub const AUDIENCE_ENGAGEMENT_WEIGHT: f64 = 0.6;
pub const VERIFIED_BONUS: f64 = 0.1;

// Historical performance
pub const HISTORY_WINDOW_DAYS: i64 = 90;
pub const HISTORY_RATING_WEIGHT: f64 = 0.7;
pub const HISTORY_GOOD_SHARE_WEIGHT: f64 = 0.3;
pub const GOOD_PLACEMENT_RATING: i32 = 4;

// Availability: placements in the trailing window (0, up to 2, up to 5, more)
pub const AVAILABILITY_WINDOW_DAYS: i64 = 7;
pub const AVAILABILITY_STEPS: [(u32, f64); 3] = [(1, 1.0), (3, 0.8), (6, 0.6)];
pub const AVAILABILITY_BUSY: f64 = 0.3;

// Explanation thresholds
pub const EXCELLENT_MATCH_SCORE: f64 = 0.8;
pub const STRONG_CATEGORY_SCORE: f64 = 0.7;
pub const STRONG_BUDGET_SCORE: f64 = 0.8;
pub const STRONG_AUDIENCE_SCORE: f64 = 0.8;

// ROI and reach estimates
pub const ROI_BASE: f64 = 1.5;
pub const ROI_SCORE_FACTOR: f64 = 2.0;
pub const ROI_RATING_BASELINE: f64 = 3.0;
pub const ROI_FLOOR: f64 = 0.5;
pub const REACH_STEPS: [(u64, f64); 3] = [(1_000, 0.8), (10_000, 0.6), (50_000, 0.4)];
pub const REACH_TOP: f64 = 0.3;

/// Look up `value` in a step table with exclusive upper bounds
pub fn step<T: PartialOrd + Copy>(value: T, steps: &[(T, f64)], top: f64) -> f64 {
    steps
        .iter()
        .find(|(bound, _)| value < *bound)
        .map(|(_, score)| *score)
        .unwrap_or(top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_boundaries_are_exclusive() {
        assert_eq!(step(999u64, &SUBSCRIBER_STEPS, SUBSCRIBER_TOP), 0.3);
        assert_eq!(step(1_000u64, &SUBSCRIBER_STEPS, SUBSCRIBER_TOP), 0.5);
        assert_eq!(step(100_000u64, &SUBSCRIBER_STEPS, SUBSCRIBER_TOP), 1.0);
        assert_eq!(step(9.99, &ENGAGEMENT_STEPS, ENGAGEMENT_TOP), 0.9);
        assert_eq!(step(10.0, &ENGAGEMENT_STEPS, ENGAGEMENT_TOP), 1.0);
    }

    #[test]
    fn budget_bounds_are_ordered() {
        assert!(BUDGET_RATIO_CHEAP < BUDGET_RATIO_OPTIMAL_MAX);
        assert!(BUDGET_RATIO_OPTIMAL_MAX < BUDGET_RATIO_ACCEPTABLE_MAX);
    }
}
