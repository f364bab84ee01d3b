// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Channel, ChannelActivity, Factor, FeatureSet, Offer, PlacementSummary, RankedCandidate,
    ScoreBreakdown, ScoringWeights,
};
pub use requests::{RecommendationRequest, ScorePairRequest};
pub use responses::{
    CategoriesResponse, ChannelRecommendationsResponse, ErrorResponse, HealthResponse,
    OfferRecommendationsResponse,
};
