use crate::core::{
    explain::{estimate_reach, estimate_roi, explain},
    features::PlacementHistory,
    scoring::score_with_summary,
    tuning::MIN_RELEVANCE_SCORE,
};
use crate::models::{Channel, Offer, RankedCandidate, ScoringWeights};

/// Result of a ranking pass
#[derive(Debug)]
pub struct MatchResult<T> {
    pub candidates: Vec<RankedCandidate<T>>,
    pub total_candidates: usize,
}

/// Ranks channels for an offer (or offers for a channel)
///
/// # Pipeline Stages
/// 1. Feature extraction per candidate
/// 2. Weighted compatibility score
/// 3. Relevance cutoff
/// 4. Stable descending sort and truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    min_score: f64,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            min_score: MIN_RELEVANCE_SCORE,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// Score one pair without applying the relevance cutoff
    pub fn score_pair(
        &self,
        offer: &Offer,
        channel: &Channel,
        history: &dyn PlacementHistory,
    ) -> RankedCandidate<Channel> {
        with_candidate(self.assess(offer, channel, history), channel.clone())
    }

    fn assess(
        &self,
        offer: &Offer,
        channel: &Channel,
        history: &dyn PlacementHistory,
    ) -> RankedCandidate<()> {
        let (breakdown, past) = score_with_summary(offer, channel, history, &self.weights);

        RankedCandidate {
            candidate: (),
            breakdown,
            estimated_roi: estimate_roi(breakdown.score, past.as_ref()),
            estimated_reach: estimate_reach(channel.subscriber_count),
            explanation: explain(&breakdown),
        }
    }

    /// Rank candidate channels for an offer
    ///
    /// # Arguments
    /// * `offer` - The advertiser's offer
    /// * `channels` - Candidates, in the order ties should keep
    /// * `history` - Placement history for the candidates
    /// * `limit` - Maximum number of results to return
    pub fn rank_channels_for_offer(
        &self,
        offer: &Offer,
        channels: Vec<Channel>,
        history: &dyn PlacementHistory,
        limit: usize,
    ) -> MatchResult<Channel> {
        let total_candidates = channels.len();

        let scored = channels
            .into_iter()
            .map(|channel| {
                let ranked = self.assess(offer, &channel, history);
                with_candidate(ranked, channel)
            })
            .collect();

        MatchResult {
            candidates: select_top(scored, self.min_score, limit),
            total_candidates,
        }
    }

    /// Rank open offers for a channel
    pub fn rank_offers_for_channel(
        &self,
        channel: &Channel,
        offers: Vec<Offer>,
        history: &dyn PlacementHistory,
        limit: usize,
    ) -> MatchResult<Offer> {
        let total_candidates = offers.len();

        let scored = offers
            .into_iter()
            .map(|offer| {
                let ranked = self.assess(&offer, channel, history);
                with_candidate(ranked, offer)
            })
            .collect();

        MatchResult {
            candidates: select_top(scored, self.min_score, limit),
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

fn with_candidate<T>(ranked: RankedCandidate<()>, candidate: T) -> RankedCandidate<T> {
    RankedCandidate {
        candidate,
        breakdown: ranked.breakdown,
        estimated_roi: ranked.estimated_roi,
        estimated_reach: ranked.estimated_reach,
        explanation: ranked.explanation,
    }
}

/// Drop candidates at or below `min_score`, sort by score (descending) and
/// keep at most `limit`. Equal scores keep their input order.
pub fn select_top<T>(
    candidates: Vec<RankedCandidate<T>>,
    min_score: f64,
    limit: usize,
) -> Vec<RankedCandidate<T>> {
    let mut kept: Vec<RankedCandidate<T>> = candidates
        .into_iter()
        .filter(|c| c.score() > min_score)
        .collect();

    // sort_by is stable
    kept.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    kept.truncate(limit);
    kept
}
