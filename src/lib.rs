//! Channel Match - compatibility scoring for a Telegram advertising marketplace
//!
//! This library ranks Telegram channels against advertising offers (and offers
//! against channels) with a multi-factor weighted score, and serves the
//! rankings over HTTP for the marketplace Mini App.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_compatibility, MatchResult, Matcher, PlacementHistory};
pub use crate::models::{Channel, Offer, RankedCandidate, ScoreBreakdown, ScoringWeights};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        assert_eq!(*matcher.weights(), ScoringWeights::default());
    }
}
