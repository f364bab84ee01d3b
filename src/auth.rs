use actix_web::dev::Payload;
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::{web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;

use crate::error::ApiError;

/// Header set by the Mini App frontend with the Telegram user id
pub const TELEGRAM_USER_HEADER: &str = "X-Telegram-User-Id";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,

    #[error("invalid user id: {0}")]
    InvalidUserId(String),

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// How callers are authenticated
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// When set, a bearer JWT (HS256) is required and its `sub` is the user id
    pub jwt_secret: Option<String>,
}

/// JWT claims issued by the marketplace backend
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// The authenticated Telegram user making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<AuthConfig>>() {
            Some(config) => authenticate(req.headers(), config).map_err(ApiError::from),
            None => Err(ApiError::Internal("authentication is not configured".to_string())),
        };
        ready(result)
    }
}

pub fn authenticate(headers: &HeaderMap, config: &AuthConfig) -> Result<AuthUser, AuthError> {
    match config.jwt_secret.as_deref() {
        Some(secret) => authorize_jwt(headers, secret),
        None => authorize_header(headers),
    }
}

fn authorize_header(headers: &HeaderMap) -> Result<AuthUser, AuthError> {
    let raw = headers
        .get(TELEGRAM_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    parse_user_id(raw)
}

fn authorize_jwt(headers: &HeaderMap, secret: &str) -> Result<AuthUser, AuthError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingCredentials)?;

    let data = decode::<Claims>(
        token.trim(),
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;

    parse_user_id(&data.claims.sub)
}

fn parse_user_id(raw: &str) -> Result<AuthUser, AuthError> {
    let user_id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| AuthError::InvalidUserId(raw.to_string()))?;

    if user_id <= 0 {
        return Err(AuthError::InvalidUserId(raw.to_string()));
    }

    Ok(AuthUser { user_id })
}
