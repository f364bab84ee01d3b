use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use channel_match::auth::AuthConfig;
use channel_match::config::{LoggingSettings, Settings};
use channel_match::core::Matcher;
use channel_match::routes::{self, AppState};
use channel_match::services::{CacheManager, PostgresClient, UserRateLimiter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Points at a settings file used instead of `config/default.toml`
const CONFIG_PATH_VAR: &str = "CHANNEL_MATCH_CONFIG";

fn init_logging(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let loaded = match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => Settings::load_from(path),
        Err(_) => Settings::load(),
    };

    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting Channel Match scoring service...");

    // Cache (Redis tier is optional)
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match settings.cache.redis_url.as_deref() {
        Some(redis_url) => match CacheManager::new(redis_url, l1_cache_size, cache_ttl).await {
            Ok(c) => {
                info!("Cache manager initialized (L1: {} entries, Redis L2, TTL: {}s)", l1_cache_size, cache_ttl);
                c
            }
            Err(e) => {
                error!("Failed to connect to Redis ({}), running with in-process cache only", e);
                CacheManager::local_only(l1_cache_size, cache_ttl)
            }
        },
        None => {
            info!("Cache manager initialized (L1 only: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
            CacheManager::local_only(l1_cache_size, cache_ttl)
        }
    };

    // Initialize PostgreSQL client
    let postgres = PostgresClient::from_settings(
        &settings.database.url,
        settings.database.max_connections,
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    .map_err(|e| {
        error!("Failed to connect to PostgreSQL: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
    })?;

    info!("PostgreSQL client initialized");

    let weights = settings.weights();
    let matcher = Matcher::new(weights).with_min_score(settings.matching.min_score);

    info!("Matcher initialized with weights: {:?}", weights);

    let rate_limiter = Arc::new(UserRateLimiter::per_minute(settings.rate_limit.requests_per_minute));
    {
        let rate_limiter = Arc::clone(&rate_limiter);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                rate_limiter.prune();
            }
        });
    }

    let app_state = AppState {
        postgres: Arc::new(postgres),
        cache: Arc::new(cache),
        rate_limiter,
        matcher,
        matching: settings.matching.clone(),
    };

    let auth_config = AuthConfig {
        jwt_secret: settings.auth.jwt_secret.clone(),
    };
    if auth_config.jwt_secret.is_none() {
        info!("JWT secret not configured, trusting the X-Telegram-User-Id header");
    }

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(auth_config.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
