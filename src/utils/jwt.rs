use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};
use std::env;
use uuid::Uuid;

use crate::models::users;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Claims du token d'accès: claims standards + claims custom
/// (username, email, joined_date, full_name)
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: i32,        // user_id
    pub token_type: String,
    pub username: String,
    pub email: String,
    pub joined_date: String, // Date ISO, ex: "2025-06-01"
    pub full_name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims du refresh token. Le jti sert de clé de révocation
/// dans la table token_blacklist.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: i32,
    pub token_type: String,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Récupère la clé secrète JWT depuis les variables d'environnement
fn get_jwt_secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| {
        log::warn!("JWT_SECRET not found in .env, using default (INSECURE)");
        "default-insecure-key-change-this".to_string()
    })
}

fn access_ttl_minutes() -> i64 {
    env::var("JWT_ACCESS_TTL_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60)
}

fn refresh_ttl_days() -> i64 {
    env::var("JWT_REFRESH_TTL_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(7)
}

/// Génère un token d'accès pour un utilisateur
pub fn generate_access_token(user: &users::Model) -> Result<String, String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::minutes(access_ttl_minutes()))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = AccessClaims {
        sub: user.id,
        token_type: TOKEN_TYPE_ACCESS.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        joined_date: user.joined_date.to_string(),
        full_name: user.full_name.clone(),
        iat: now.timestamp(),
        exp: expiration,
    };

    let secret = get_jwt_secret();

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Génère un refresh token avec un jti frais
pub fn generate_refresh_token(user_id: i32) -> Result<String, String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::days(refresh_ttl_days()))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = RefreshClaims {
        sub: user_id,
        token_type: TOKEN_TYPE_REFRESH.to_string(),
        jti: Uuid::new_v4(),
        iat: now.timestamp(),
        exp: expiration,
    };

    let secret = get_jwt_secret();

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Génère la paire access + refresh émise au login/register
pub fn generate_pair(user: &users::Model) -> Result<TokenPair, String> {
    Ok(TokenPair {
        access: generate_access_token(user)?,
        refresh: generate_refresh_token(user.id)?,
    })
}

/// Vérifie et décode un token d'accès
/// Rejette les refresh tokens présentés à la place d'un access token
pub fn verify_access_token(token: &str) -> Result<AccessClaims, String> {
    let secret = get_jwt_secret();

    let claims = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))?;

    if claims.token_type != TOKEN_TYPE_ACCESS {
        return Err("Not an access token".to_string());
    }

    Ok(claims)
}

/// Vérifie et décode un refresh token
pub fn verify_refresh_token(token: &str) -> Result<RefreshClaims, String> {
    let secret = get_jwt_secret();

    let claims = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))?;

    if claims.token_type != TOKEN_TYPE_REFRESH {
        return Err("Not a refresh token".to_string());
    }

    Ok(claims)
}
