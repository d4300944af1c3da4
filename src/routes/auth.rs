use actix_web::{post, web, HttpRequest, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::errors::ApiError;
use crate::middleware::{AuthUser, maybe_auth_user};
use crate::models::dto::{RegisterRequest, UserResponse};
use crate::services::token_service::TokenService;
use crate::services::user_service::UserService;
use crate::utils::jwt;

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// DTO pour le renouvellement d'access token
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

// DTO pour le logout
#[derive(Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// POST /auth/register - Créer un compte (PUBLIC)
/// Crée le user et son profil vide, puis émet une paire de tokens
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let user = UserService::register(db.get_ref(), body.into_inner()).await?;

    let tokens = jwt::generate_pair(&user).map_err(ApiError::Internal)?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "user": UserResponse::from(&user),
        "refresh": tokens.refresh,
        "access": tokens.access
    })))
}

/// POST /auth/login - Se connecter (PUBLIC)
/// Un caller déjà authentifié est refusé (policy: pas de re-login)
#[post("/login")]
pub async fn login(
    req: HttpRequest,
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    if maybe_auth_user(&req).is_some() {
        return Err(ApiError::BadRequest(
            "You are already authenticated".to_string(),
        ));
    }

    let tokens = TokenService::login(db.get_ref(), &body.email, &body.password).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "refresh": tokens.refresh,
        "access": tokens.access
    })))
}

/// POST /auth/token - Obtenir une paire de tokens (PUBLIC)
/// Même émission que le login, avec les claims custom dans l'access token
#[post("/token")]
pub async fn token_obtain(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let tokens = TokenService::login(db.get_ref(), &body.email, &body.password).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "refresh": tokens.refresh,
        "access": tokens.access
    })))
}

/// POST /auth/token/refresh - Renouveler l'access token (PUBLIC, refresh requis)
#[post("/token/refresh")]
pub async fn token_refresh(
    body: web::Json<RefreshRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let access = TokenService::refresh(db.get_ref(), &body.refresh).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "access": access })))
}

/// POST /auth/logout - Révoquer un refresh token (PROTÉGÉE)
#[post("/logout")]
pub async fn logout(
    auth_user: AuthUser,
    body: web::Json<LogoutRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let caller = UserService::require_caller(db.get_ref(), auth_user.user_id).await?;

    TokenService::revoke(db.get_ref(), &caller, &body.refresh_token).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Token revoked successfully"
    })))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(token_obtain)
            .service(token_refresh)
            .service(logout)
    );
}
