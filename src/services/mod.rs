// Service exports
pub mod cache;
pub mod postgres;
pub mod rate_limit;

pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use postgres::{PostgresClient, PostgresError};
pub use rate_limit::{RateLimited, UserRateLimiter};
