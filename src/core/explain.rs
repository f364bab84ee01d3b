use std::fmt;

use crate::core::tuning::*;
use crate::models::{PlacementSummary, ScoreBreakdown};

/// Dominant reason a candidate was recommended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    Excellent,
    Topic,
    Price,
    Audience,
    General,
}

impl MatchReason {
    /// Decision list evaluated top to bottom; the first hit wins
    pub fn from_breakdown(breakdown: &ScoreBreakdown) -> Self {
        let features = &breakdown.features;
        if breakdown.score > EXCELLENT_MATCH_SCORE {
            MatchReason::Excellent
        } else if features.category > STRONG_CATEGORY_SCORE {
            MatchReason::Topic
        } else if features.budget > STRONG_BUDGET_SCORE {
            MatchReason::Price
        } else if features.audience > STRONG_AUDIENCE_SCORE {
            MatchReason::Audience
        } else {
            MatchReason::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchReason::Excellent => "excellent match across all factors",
            MatchReason::Topic => "matches topic well",
            MatchReason::Price => "optimal price/reach ratio",
            MatchReason::Audience => "high-quality audience",
            MatchReason::General => "good performance indicators",
        }
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn explain(breakdown: &ScoreBreakdown) -> String {
    MatchReason::from_breakdown(breakdown).to_string()
}

/// Expected return multiple, scaled by past ratings when there are any
pub fn estimate_roi(score: f64, history: Option<&PlacementSummary>) -> f64 {
    let mut roi = ROI_BASE + ROI_SCORE_FACTOR * score;

    if let Some(avg) = history
        .filter(|summary| !summary.is_empty())
        .and_then(|summary| summary.average_rating)
    {
        roi *= avg / ROI_RATING_BASELINE;
    }

    roi.max(ROI_FLOOR)
}

/// Subscribers expected to see a post; smaller channels reach a larger share
pub fn estimate_reach(subscriber_count: u64) -> u64 {
    let rate = step(subscriber_count, &REACH_STEPS, REACH_TOP);
    (subscriber_count as f64 * rate) as u64
}
