use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::auth::AuthUser;
use crate::config::MatchingSettings;
use crate::core::{all_categories, ActivitySnapshot, Matcher, NoHistory};
use crate::error::ApiError;
use crate::models::{
    CategoriesResponse, Channel, ChannelRecommendationsResponse, HealthResponse, Offer,
    OfferRecommendationsResponse, RecommendationRequest, ScorePairRequest,
};
use crate::services::{CacheError, CacheKey, CacheManager, PostgresClient, UserRateLimiter};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub rate_limiter: Arc<UserRateLimiter>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

impl AppState {
    fn resolve_limit(&self, requested: Option<u16>) -> usize {
        requested
            .map(usize::from)
            .unwrap_or(self.matching.default_limit)
            .min(self.matching.max_limit)
    }
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/categories", web::get().to(list_categories))
        .route("/matching/offers/{offer_id}/channels", web::get().to(recommend_channels))
        .route("/matching/channels/{channel_id}/offers", web::get().to(recommend_offers))
        .route("/matching/score", web::post().to(score_pair));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: state.cache.stats(),
        timestamp: chrono::Utc::now(),
    })
}

/// Category taxonomy endpoint
///
/// GET /api/v1/categories
async fn list_categories() -> impl Responder {
    HttpResponse::Ok().json(CategoriesResponse {
        categories: all_categories(),
    })
}

/// Rank channels for an offer
///
/// GET /api/v1/matching/offers/{offer_id}/channels?limit=20
async fn recommend_channels(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<i64>,
    query: web::Query<RecommendationRequest>,
) -> Result<HttpResponse, ApiError> {
    state.rate_limiter.check(user.user_id)?;
    query.validate()?;

    let offer_id = path.into_inner();
    let limit = state.resolve_limit(query.limit);

    tracing::info!("Ranking channels for offer {} (user {}, limit {})", offer_id, user.user_id, limit);

    let offer = load_offer(&state, offer_id).await?;
    let channels = state
        .postgres
        .list_candidate_channels(user.user_id, state.matching.candidate_pool)
        .await?;

    let channel_ids: Vec<i64> = channels.iter().map(|c| c.id).collect();
    let activity = state.postgres.activity_snapshot(&channel_ids).await;

    let result = state
        .matcher
        .rank_channels_for_offer(&offer, channels, &activity, limit);

    tracing::info!(
        "Returning {} channels for offer {} (from {} candidates)",
        result.candidates.len(),
        offer_id,
        result.total_candidates
    );

    Ok(HttpResponse::Ok().json(ChannelRecommendationsResponse {
        offer_id,
        candidates: result.candidates,
        total_candidates: result.total_candidates,
    }))
}

/// Rank open offers for a channel
///
/// GET /api/v1/matching/channels/{channel_id}/offers?limit=20
async fn recommend_offers(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<i64>,
    query: web::Query<RecommendationRequest>,
) -> Result<HttpResponse, ApiError> {
    state.rate_limiter.check(user.user_id)?;
    query.validate()?;

    let channel_id = path.into_inner();
    let limit = state.resolve_limit(query.limit);

    tracing::info!("Ranking offers for channel {} (user {}, limit {})", channel_id, user.user_id, limit);

    let channel = load_channel(&state, channel_id).await?;
    let offers = state
        .postgres
        .list_open_offers(user.user_id, state.matching.candidate_pool)
        .await?;

    let mut activity = ActivitySnapshot::new();
    activity.insert(channel.id, state.postgres.channel_activity(channel.id).await);

    let result = state
        .matcher
        .rank_offers_for_channel(&channel, offers, &activity, limit);

    tracing::info!(
        "Returning {} offers for channel {} (from {} candidates)",
        result.candidates.len(),
        channel_id,
        result.total_candidates
    );

    Ok(HttpResponse::Ok().json(OfferRecommendationsResponse {
        channel_id,
        candidates: result.candidates,
        total_candidates: result.total_candidates,
    }))
}

/// Score a single offer/channel pair as if the channel were new
///
/// POST /api/v1/matching/score
///
/// Request body:
/// ```json
/// {
///   "offer": {"id": 1, "category": "tech", "budget": 10000},
///   "channel": {"id": 2, "title": "...", "subscriberCount": 15000, "pricePerPost": 2000}
/// }
/// ```
async fn score_pair(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<ScorePairRequest>,
) -> Result<HttpResponse, ApiError> {
    state.rate_limiter.check(user.user_id)?;
    req.validate()?;

    let ranked = state.matcher.score_pair(&req.offer, &req.channel, &NoHistory);

    tracing::debug!(
        "Scored offer {} against channel {}: {:.3}",
        req.offer.id,
        req.channel.id,
        ranked.score()
    );

    Ok(HttpResponse::Ok().json(ranked))
}

async fn load_offer(state: &AppState, offer_id: i64) -> Result<Offer, ApiError> {
    let key = CacheKey::offer(offer_id);
    match state.cache.get::<Offer>(&key).await {
        Ok(offer) => return Ok(offer),
        Err(CacheError::CacheMiss(_)) => {}
        Err(e) => tracing::warn!("Cache read failed for {}: {}", key, e),
    }

    let offer = state.postgres.get_offer(offer_id).await?;
    if let Err(e) = state.cache.set(&key, &offer).await {
        tracing::warn!("Failed to cache {}: {}", key, e);
    }
    Ok(offer)
}

async fn load_channel(state: &AppState, channel_id: i64) -> Result<Channel, ApiError> {
    let key = CacheKey::channel(channel_id);
    match state.cache.get::<Channel>(&key).await {
        Ok(channel) => return Ok(channel),
        Err(CacheError::CacheMiss(_)) => {}
        Err(e) => tracing::warn!("Cache read failed for {}: {}", key, e),
    }

    let channel = state.postgres.get_channel(channel_id).await?;
    if let Err(e) = state.cache.set(&key, &channel).await {
        tracing::warn!("Failed to cache {}: {}", key, e);
    }
    Ok(channel)
}
