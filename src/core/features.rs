use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::core::categories::{find_category, CATEGORIES};
use crate::core::tuning::*;
use crate::models::{Channel, ChannelActivity, FeatureSet, Offer, PlacementSummary};

/// Errors from placement history lookups
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("no activity recorded for channel {0}")]
    Missing(i64),

    #[error("lookup failed for channel {channel_id}: {reason}")]
    Unavailable { channel_id: i64, reason: String },
}

/// Read access to a channel's placement history
///
/// `summary` covers the trailing [`HISTORY_WINDOW_DAYS`],
/// `recent_placements` the trailing [`AVAILABILITY_WINDOW_DAYS`].
pub trait PlacementHistory {
    fn summary(&self, channel_id: i64) -> Result<PlacementSummary, LookupError>;
    fn recent_placements(&self, channel_id: i64) -> Result<u32, LookupError>;
}

/// History source for channels that have never hosted a placement
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl PlacementHistory for NoHistory {
    fn summary(&self, _channel_id: i64) -> Result<PlacementSummary, LookupError> {
        Ok(PlacementSummary::default())
    }

    fn recent_placements(&self, _channel_id: i64) -> Result<u32, LookupError> {
        Ok(0)
    }
}

/// Activity gathered ahead of a ranking pass, keyed by channel id
#[derive(Debug, Clone, Default)]
pub struct ActivitySnapshot {
    channels: HashMap<i64, ChannelActivity>,
}

impl ActivitySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, channel_id: i64, activity: ChannelActivity) {
        self.channels.insert(channel_id, activity);
    }

    fn activity(&self, channel_id: i64) -> Result<&ChannelActivity, LookupError> {
        self.channels
            .get(&channel_id)
            .ok_or(LookupError::Missing(channel_id))
    }
}

impl FromIterator<(i64, ChannelActivity)> for ActivitySnapshot {
    fn from_iter<I: IntoIterator<Item = (i64, ChannelActivity)>>(iter: I) -> Self {
        Self {
            channels: iter.into_iter().collect(),
        }
    }
}

impl PlacementHistory for ActivitySnapshot {
    fn summary(&self, channel_id: i64) -> Result<PlacementSummary, LookupError> {
        self.activity(channel_id)?
            .history
            .ok_or_else(|| LookupError::Unavailable {
                channel_id,
                reason: "placement history query failed".to_string(),
            })
    }

    fn recent_placements(&self, channel_id: i64) -> Result<u32, LookupError> {
        self.activity(channel_id)?
            .recent_placements
            .ok_or_else(|| LookupError::Unavailable {
                channel_id,
                reason: "recent placement query failed".to_string(),
            })
    }
}

/// Derive the five sub-scores for an (offer, channel) pair.
///
/// Never fails: missing data and failed lookups map to neutral defaults.
pub fn extract(offer: &Offer, channel: &Channel, history: &dyn PlacementHistory) -> FeatureSet {
    extract_with_summary(offer, channel, history).0
}

/// [`extract`] plus the placement summary the historical score came from,
/// `None` when the lookup failed
pub(crate) fn extract_with_summary(
    offer: &Offer,
    channel: &Channel,
    history: &dyn PlacementHistory,
) -> (FeatureSet, Option<PlacementSummary>) {
    let summary = lookup_summary(channel.id, history);

    let features = FeatureSet {
        category: category_match(offer, channel),
        budget: budget_compatibility(channel.price_per_post, offer.budget),
        audience: audience_quality(channel),
        historical: summary
            .as_ref()
            .map(score_history)
            .unwrap_or(NEUTRAL_HISTORY_SCORE),
        availability: availability(channel.id, history),
    };

    (features, summary)
}

/// Share of the offer category's keywords found in the channel text
pub fn category_match(offer: &Offer, channel: &Channel) -> f64 {
    let category = match offer.category.as_deref().and_then(find_category) {
        Some(category) => category,
        None => return NEUTRAL_CATEGORY_SCORE,
    };
    if !channel.has_description() {
        return NEUTRAL_CATEGORY_SCORE;
    }

    let text = channel.searchable_text();
    let matches = category
        .keywords
        .iter()
        .filter(|keyword| contains_keyword(&text, keyword))
        .count();

    matches as f64 / category.keywords.len() as f64
}

/// Substring match, except short ASCII keywords ("it") which must stand
/// alone so "kitchen" or "fitness" do not count
fn contains_keyword(text: &str, keyword: &str) -> bool {
    match whole_word_patterns().get(keyword) {
        Some(pattern) => pattern.is_match(text),
        None => text.contains(keyword),
    }
}

fn whole_word_patterns() -> &'static HashMap<&'static str, Regex> {
    static PATTERNS: OnceLock<HashMap<&'static str, Regex>> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        CATEGORIES
            .iter()
            .flat_map(|category| category.keywords.iter().copied())
            .filter(|keyword| keyword.is_ascii() && keyword.len() <= SHORT_KEYWORD_MAX_LEN)
            .filter_map(|keyword| {
                match Regex::new(&format!(r"\b{}\b", regex::escape(keyword))) {
                    Ok(pattern) => Some((keyword, pattern)),
                    Err(e) => {
                        tracing::warn!("Falling back to substring match for {:?}: {}", keyword, e);
                        None
                    }
                }
            })
            .collect()
    })
}

/// Score how sensibly the channel price fits into the offer budget
pub fn budget_compatibility(price_per_post: f64, budget: f64) -> f64 {
    if price_per_post <= 0.0 || budget <= 0.0 {
        return NEUTRAL_BUDGET_SCORE;
    }

    let ratio = price_per_post / budget;
    if ratio < BUDGET_RATIO_CHEAP {
        BUDGET_SCORE_CHEAP
    } else if ratio <= BUDGET_RATIO_OPTIMAL_MAX {
        BUDGET_SCORE_OPTIMAL
    } else if ratio <= BUDGET_RATIO_ACCEPTABLE_MAX {
        BUDGET_SCORE_ACCEPTABLE
    } else {
        BUDGET_SCORE_EXPENSIVE
    }
}

/// Audience quality clamped to 1.0
pub fn audience_quality(channel: &Channel) -> f64 {
    raw_audience_quality(channel).min(1.0)
}

/// Size/engagement blend plus the verified bonus; may exceed 1.0
pub fn raw_audience_quality(channel: &Channel) -> f64 {
    let size_score = step(channel.subscriber_count, &SUBSCRIBER_STEPS, SUBSCRIBER_TOP);
    let engagement_score = step(channel.engagement_rate, &ENGAGEMENT_STEPS, ENGAGEMENT_TOP);
    let bonus = if channel.is_verified { VERIFIED_BONUS } else { 0.0 };

    size_score * AUDIENCE_SIZE_WEIGHT + engagement_score * AUDIENCE_ENGAGEMENT_WEIGHT + bonus
}

pub fn historical_performance(channel_id: i64, history: &dyn PlacementHistory) -> f64 {
    lookup_summary(channel_id, history)
        .as_ref()
        .map(score_history)
        .unwrap_or(NEUTRAL_HISTORY_SCORE)
}

fn lookup_summary(channel_id: i64, history: &dyn PlacementHistory) -> Option<PlacementSummary> {
    match history.summary(channel_id) {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::warn!("Using neutral history score for channel {}: {}", channel_id, e);
            None
        }
    }
}

/// Blend the normalized average rating with the share of good placements
pub fn score_history(summary: &PlacementSummary) -> f64 {
    if summary.is_empty() {
        return NEUTRAL_HISTORY_SCORE;
    }

    let rating_score = summary
        .average_rating
        .map(|avg| ((avg - 1.0) / 4.0).clamp(0.0, 1.0))
        .unwrap_or(NEUTRAL_RATING_SCORE);
    let good_share = (summary.good_count.min(summary.count) as f64) / summary.count as f64;

    rating_score * HISTORY_RATING_WEIGHT + good_share * HISTORY_GOOD_SHARE_WEIGHT
}

pub fn availability(channel_id: i64, history: &dyn PlacementHistory) -> f64 {
    match history.recent_placements(channel_id) {
        Ok(count) => step(count, &AVAILABILITY_STEPS, AVAILABILITY_BUSY),
        Err(e) => {
            tracing::warn!("Using neutral availability for channel {}: {}", channel_id, e);
            NEUTRAL_AVAILABILITY_SCORE
        }
    }
}
