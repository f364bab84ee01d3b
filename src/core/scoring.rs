use crate::core::features::{extract_with_summary, PlacementHistory};
use crate::models::{
    Channel, FeatureSet, Offer, PlacementSummary, ScoreBreakdown, ScoringWeights,
};

/// Calculate a compatibility score (0-1) for an offer/channel pair
///
/// Scoring formula:
/// score = (
///     category * 0.30 +       # Offer category keywords in channel text
///     budget * 0.25 +         # Channel price as a share of the budget
///     audience * 0.20 +       # Subscriber count, engagement, verification
///     historical * 0.15 +     # Ratings of the last 3 months of placements
///     availability * 0.10     # Placements booked in the last 7 days
/// )
pub fn calculate_compatibility(
    offer: &Offer,
    channel: &Channel,
    history: &dyn PlacementHistory,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    score_with_summary(offer, channel, history, weights).0
}

/// Score a pair and hand back the placement summary read along the way
pub(crate) fn score_with_summary(
    offer: &Offer,
    channel: &Channel,
    history: &dyn PlacementHistory,
    weights: &ScoringWeights,
) -> (ScoreBreakdown, Option<PlacementSummary>) {
    let (features, summary) = extract_with_summary(offer, channel, history);
    let score = combine(&features, weights);
    (ScoreBreakdown { features, score }, summary)
}

/// Weighted sum of the sub-scores, clamped to [0, 1]
#[inline]
pub fn combine(features: &FeatureSet, weights: &ScoringWeights) -> f64 {
    let total: f64 = features
        .factors()
        .map(|(factor, value)| value * weights.get(factor))
        .sum();

    total.min(1.0).max(0.0)
}
