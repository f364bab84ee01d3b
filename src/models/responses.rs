use serde::{Deserialize, Serialize};
use crate::core::categories::Category;
use crate::models::domain::{Channel, Offer, RankedCandidate};
use crate::services::CacheStats;

/// Channels ranked for one offer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRecommendationsResponse {
    #[serde(rename = "offerId")]
    pub offer_id: i64,
    pub candidates: Vec<RankedCandidate<Channel>>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Offers ranked for one channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferRecommendationsResponse {
    #[serde(rename = "channelId")]
    pub channel_id: i64,
    pub candidates: Vec<RankedCandidate<Offer>>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Category taxonomy for UI population
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<&'static Category>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cache: CacheStats,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
