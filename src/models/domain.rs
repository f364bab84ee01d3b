use serde::{Deserialize, Serialize};
use validator::Validate;

/// Advertiser's request for a paid post placement
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Offer {
    pub id: i64,
    #[serde(rename = "createdBy", default)]
    pub created_by: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    pub budget: f64,
    #[serde(rename = "targetAudience", default)]
    pub target_audience: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Publisher's advertising inventory (a Telegram channel profile)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Channel {
    pub id: i64,
    #[serde(rename = "ownerId", default)]
    pub owner_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "subscriberCount", default)]
    pub subscriber_count: u64,
    #[serde(rename = "pricePerPost", default)]
    #[validate(range(min = 0.0))]
    pub price_per_post: f64,
    /// Percentage, 0-100
    #[serde(rename = "engagementRate", default = "default_engagement_rate")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub engagement_rate: f64,
    #[serde(rename = "isVerified", default)]
    pub is_verified: bool,
}

impl Channel {
    /// Title and description joined for keyword matching
    pub fn searchable_text(&self) -> String {
        let mut text = self.title.clone();
        if let Some(description) = &self.description {
            text.push(' ');
            text.push_str(description);
        }
        text.to_lowercase()
    }

    pub fn has_description(&self) -> bool {
        self.description
            .as_deref()
            .map(|d| !d.trim().is_empty())
            .unwrap_or(false)
    }
}

fn default_engagement_rate() -> f64 {
    crate::core::tuning::DEFAULT_ENGAGEMENT_RATE
}

/// Placement history of a channel inside the trailing history window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementSummary {
    pub count: u32,
    /// Average of rated placements on a 1-5 scale, `None` when nothing was rated
    #[serde(rename = "averageRating")]
    pub average_rating: Option<f64>,
    /// Placements rated 4 or better
    #[serde(rename = "goodCount")]
    pub good_count: u32,
}

impl PlacementSummary {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Per-channel lookup results gathered before a ranking pass.
///
/// `None` marks a lookup that failed and should fall back to its neutral default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelActivity {
    pub history: Option<PlacementSummary>,
    pub recent_placements: Option<u32>,
}

/// The five normalized sub-scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub category: f64,
    pub budget: f64,
    pub audience: f64,
    pub historical: f64,
    pub availability: f64,
}

/// Scoring factor names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Category,
    Budget,
    Audience,
    Historical,
    Availability,
}

impl Factor {
    pub const ALL: [Factor; 5] = [
        Factor::Category,
        Factor::Budget,
        Factor::Audience,
        Factor::Historical,
        Factor::Availability,
    ];
}

impl FeatureSet {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Category => self.category,
            Factor::Budget => self.budget,
            Factor::Audience => self.audience,
            Factor::Historical => self.historical,
            Factor::Availability => self.availability,
        }
    }

    pub fn factors(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

/// Weighted score plus the sub-scores it was computed from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub features: FeatureSet,
    pub score: f64,
}

/// A channel (or offer) with its score, estimates and explanation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate<T> {
    pub candidate: T,
    pub breakdown: ScoreBreakdown,
    #[serde(rename = "estimatedRoi")]
    pub estimated_roi: f64,
    #[serde(rename = "estimatedReach")]
    pub estimated_reach: u64,
    pub explanation: String,
}

impl<T> RankedCandidate<T> {
    pub fn score(&self) -> f64 {
        self.breakdown.score
    }
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub category: f64,
    pub budget: f64,
    pub audience: f64,
    pub historical: f64,
    pub availability: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.category + self.budget + self.audience + self.historical + self.availability
    }

    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Category => self.category,
            Factor::Budget => self.budget,
            Factor::Audience => self.audience,
            Factor::Historical => self.historical,
            Factor::Availability => self.availability,
        }
    }

    /// Non-negative and summing to 1.0
    pub fn is_normalized(&self) -> bool {
        Factor::ALL.iter().all(|f| self.get(*f) >= 0.0) && (self.sum() - 1.0).abs() < 1e-6
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            category: 0.30,
            budget: 0.25,
            audience: 0.20,
            historical: 0.15,
            availability: 0.10,
        }
    }
}
