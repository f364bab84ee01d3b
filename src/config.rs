use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::tuning::{DEFAULT_RESULT_LIMIT, MIN_RELEVANCE_SCORE};
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Redis L2 tier; L1 only when unset
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// Candidates loaded from the database per ranking call
    #[serde(default = "default_candidate_pool")]
    pub candidate_pool: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            min_score: default_min_score(),
            candidate_pool: default_candidate_pool(),
        }
    }
}

fn default_limit() -> usize { DEFAULT_RESULT_LIMIT }
fn default_max_limit() -> usize { 50 }
fn default_min_score() -> f64 { MIN_RELEVANCE_SCORE }
fn default_candidate_pool() -> usize { 50 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_category_weight")]
    pub category: f64,
    #[serde(default = "default_budget_weight")]
    pub budget: f64,
    #[serde(default = "default_audience_weight")]
    pub audience: f64,
    #[serde(default = "default_historical_weight")]
    pub historical: f64,
    #[serde(default = "default_availability_weight")]
    pub availability: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            category: default_category_weight(),
            budget: default_budget_weight(),
            audience: default_audience_weight(),
            historical: default_historical_weight(),
            availability: default_availability_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        ScoringWeights {
            category: config.category,
            budget: config.budget,
            audience: config.audience,
            historical: config.historical,
            availability: config.availability,
        }
    }
}

fn default_category_weight() -> f64 { 0.30 }
fn default_budget_weight() -> f64 { 0.25 }
fn default_audience_weight() -> f64 { 0.20 }
fn default_historical_weight() -> f64 { 0.15 }
fn default_availability_weight() -> f64 { 0.10 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

fn default_requests_per_minute() -> u32 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CHANNEL_MATCH__)
    /// 5. DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name("config/local").required(false)),
        )
    }

    /// Load configuration from a custom path instead of `config/`
    ///
    /// Environment variables and `DATABASE_URL` still apply on top.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_builder(Config::builder().add_source(File::from(path.as_ref())))
    }

    fn from_builder(files: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        // e.g., CHANNEL_MATCH__SERVER__PORT -> server.port
        let settings = files.add_source(environment()).build()?;
        let settings = override_database_url(settings, std::env::var("DATABASE_URL").ok())?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }

    /// Reject settings the scorer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = self.weights();
        if !weights.is_normalized() {
            return Err(ConfigError::Message(format!(
                "scoring weights must be non-negative and sum to 1.0 (got {:.4})",
                weights.sum()
            )));
        }

        let matching = &self.matching;
        if matching.default_limit == 0 || matching.default_limit > matching.max_limit {
            return Err(ConfigError::Message(format!(
                "matching.default_limit must be between 1 and max_limit ({})",
                matching.max_limit
            )));
        }

        if matching.candidate_pool == 0 {
            return Err(ConfigError::Message(
                "matching.candidate_pool must be positive".to_string(),
            ));
        }

        if !(0.0..1.0).contains(&matching.min_score) {
            return Err(ConfigError::Message(
                "matching.min_score must be in [0, 1)".to_string(),
            ));
        }

        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("CHANNEL_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// DATABASE_URL wins over the file and prefixed variables
fn override_database_url(settings: Config, url: Option<String>) -> Result<Config, ConfigError> {
    match url {
        Some(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        None => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    const MINIMAL: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8080

        [database]
        url = "postgres://localhost/market"
    "#;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.category, 0.30);
        assert_eq!(weights.budget, 0.25);
        assert_eq!(weights.audience, 0.20);
        assert_eq!(weights.historical, 0.15);
        assert_eq!(weights.availability, 0.10);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let settings = parse(MINIMAL).unwrap();
        assert_eq!(settings.matching.default_limit, 20);
        assert_eq!(settings.matching.min_score, 0.3);
        assert_eq!(settings.rate_limit.requests_per_minute, 60);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, "json");
        assert!(settings.cache.redis_url.is_none());
        assert_eq!(settings.weights(), ScoringWeights::default());
    }

    #[test]
    fn test_unbalanced_weights_rejected() {
        let toml = format!("{}\n[scoring.weights]\ncategory = 0.9\n", MINIMAL);
        let err = parse(&toml).unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_load_from_custom_path() {
        let path = std::env::temp_dir().join(format!("channel-match-{}.toml", std::process::id()));
        std::fs::write(&path, format!("{}\n[rate_limit]\nrequests_per_minute = 5\n", MINIMAL))
            .unwrap();

        let settings = Settings::load_from(&path);
        std::fs::remove_file(&path).unwrap();

        let settings = settings.unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.rate_limit.requests_per_minute, 5);
        let expected_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/market".to_string());
        assert_eq!(settings.database.url, expected_url);
    }

    #[test]
    fn test_database_url_override() {
        let file = Config::builder()
            .add_source(File::from_str(MINIMAL, FileFormat::Toml))
            .build()
            .unwrap();

        let overridden =
            override_database_url(file.clone(), Some("postgres://db.internal/market".to_string()))
                .unwrap();
        assert_eq!(
            overridden.get_string("database.url").unwrap(),
            "postgres://db.internal/market"
        );

        let untouched = override_database_url(file, None).unwrap();
        assert_eq!(
            untouched.get_string("database.url").unwrap(),
            "postgres://localhost/market"
        );
    }

    #[test]
    fn test_limit_bounds_rejected() {
        let toml = format!("{}\n[matching]\ndefault_limit = 80\nmax_limit = 50\n", MINIMAL);
        assert!(parse(&toml).is_err());
    }
}
