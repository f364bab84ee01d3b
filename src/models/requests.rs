use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Channel, Offer};

/// Request to rank candidates for an offer or a channel
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[validate(range(min = 1, max = 50))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to score a single offer/channel pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScorePairRequest {
    #[validate(nested)]
    pub offer: Offer,
    #[validate(nested)]
    pub channel: Channel,
}
