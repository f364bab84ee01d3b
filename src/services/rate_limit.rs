use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("rate limit exceeded for user {0}")]
pub struct RateLimited(pub i64);

/// Per-user request limiter shared by all handlers
pub struct UserRateLimiter {
    limiter: DefaultKeyedRateLimiter<i64>,
}

impl UserRateLimiter {
    /// Allow `requests` per minute per user, with a burst of the same size
    pub fn per_minute(requests: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    pub fn check(&self, user_id: i64) -> Result<(), RateLimited> {
        self.limiter
            .check_key(&user_id)
            .map_err(|_| RateLimited(user_id))
    }

    /// Forget users whose quota has fully replenished
    pub fn prune(&self) {
        self.limiter.retain_recent();
        tracing::trace!("Rate limiter tracks {} users", self.limiter.len());
    }
}
