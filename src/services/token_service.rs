use sea_orm::*;
use chrono::Utc;

use crate::errors::ApiError;
use crate::models::{token_blacklist, users};
use crate::services::user_service::UserService;
use crate::utils::jwt;

pub struct TokenService;

impl TokenService {
    /// Authentifie par email/password et émet une paire access + refresh.
    /// Ordre des checks: existence de l'email, mot de passe, compte actif.
    pub async fn login(
        db: &DatabaseConnection,
        email: &str,
        password: &str,
    ) -> Result<jwt::TokenPair, ApiError> {
        let user = UserService::find_by_email(db, email)
            .await?
            .ok_or_else(|| ApiError::BadRequest("email does not exist".to_string()))?;

        if !UserService::check_password(&user, password)? {
            return Err(ApiError::BadRequest("Invalid password".to_string()));
        }

        if !user.is_active {
            return Err(ApiError::Unauthorized("User is not active".to_string()));
        }

        jwt::generate_pair(&user).map_err(ApiError::Internal)
    }

    /// Émet un nouvel access token contre un refresh token valide.
    /// Tous les échecs valent 401.
    pub async fn refresh(
        db: &DatabaseConnection,
        refresh_token: &str,
    ) -> Result<String, ApiError> {
        let claims = jwt::verify_refresh_token(refresh_token)
            .map_err(ApiError::Unauthorized)?;

        // Refus des tokens révoqués avant toute autre considération
        let revoked = token_blacklist::Entity::find()
            .filter(token_blacklist::Column::Jti.eq(claims.jti))
            .one(db)
            .await?
            .is_some();
        if revoked {
            return Err(ApiError::Unauthorized(
                "Token has been revoked".to_string(),
            ));
        }

        let user = users::Entity::find_by_id(claims.sub)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

        if !user.is_active {
            return Err(ApiError::Unauthorized("User is not active".to_string()));
        }

        jwt::generate_access_token(&user).map_err(ApiError::Internal)
    }

    /// Révoque un refresh token (logout): structure/signature, puis
    /// ownership (le caller doit posséder le token ou être staff),
    /// puis insertion du jti en blacklist. Révoquer un token déjà
    /// révoqué est un succès idempotent.
    pub async fn revoke(
        db: &DatabaseConnection,
        caller: &users::Model,
        refresh_token: &str,
    ) -> Result<(), ApiError> {
        let claims = jwt::verify_refresh_token(refresh_token)
            .map_err(|_| ApiError::BadRequest("Invalid refresh token".to_string()))?;

        let owner = users::Entity::find_by_id(claims.sub)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::BadRequest("Unknown user".to_string()))?;

        if caller.id != owner.id && !caller.is_staff() {
            return Err(ApiError::Forbidden(
                "You do not have permission to revoke this token".to_string(),
            ));
        }

        let already_revoked = token_blacklist::Entity::find()
            .filter(token_blacklist::Column::Jti.eq(claims.jti))
            .one(db)
            .await?
            .is_some();
        if already_revoked {
            return Ok(());
        }

        let entry = token_blacklist::ActiveModel {
            jti: Set(claims.jti),
            user_id: Set(owner.id),
            blacklisted_at: Set(Utc::now()),
            ..Default::default()
        };
        entry.insert(db).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::password;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn stored_user(id: i32, password_plain: &str, is_active: bool) -> users::Model {
        users::Model {
            id,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            full_name: "Alice Doe".to_string(),
            password_hash: password::hash_password_fast(password_plain).unwrap(),
            is_verified: true,
            is_active,
            is_admin: false,
            joined_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        match TokenService::login(&db, "nobody@x.com", "Secret123").await {
            Err(ApiError::BadRequest(message)) => assert_eq!(message, "email does not exist"),
            other => panic!("expected BadRequest, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user(1, "Secret123", true)]])
            .into_connection();

        match TokenService::login(&db, "alice@x.com", "WrongPass1").await {
            Err(ApiError::BadRequest(message)) => assert_eq!(message, "Invalid password"),
            other => panic!("expected BadRequest, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_login_inactive_account() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user(1, "Secret123", false)]])
            .into_connection();

        match TokenService::login(&db, "alice@x.com", "Secret123").await {
            Err(ApiError::Unauthorized(message)) => assert_eq!(message, "User is not active"),
            other => panic!("expected Unauthorized, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_login_success_returns_pair() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user(1, "Secret123", true)]])
            .into_connection();

        let pair = TokenService::login(&db, "alice@x.com", "Secret123").await.unwrap();
        assert_eq!(jwt::verify_access_token(&pair.access).unwrap().sub, 1);
        assert_eq!(jwt::verify_refresh_token(&pair.refresh).unwrap().sub, 1);
    }

    #[tokio::test]
    async fn test_refresh_rejects_revoked_token() {
        let refresh = jwt::generate_refresh_token(1).unwrap();
        let claims = jwt::verify_refresh_token(&refresh).unwrap();

        let blacklisted = token_blacklist::Model {
            id: 1,
            jti: claims.jti,
            user_id: 1,
            blacklisted_at: Utc::now(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![blacklisted]])
            .into_connection();

        match TokenService::refresh(&db, &refresh).await {
            Err(ApiError::Unauthorized(message)) => assert_eq!(message, "Token has been revoked"),
            other => panic!("expected Unauthorized, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let access = jwt::generate_access_token(&stored_user(1, "Secret123", true)).unwrap();

        assert!(matches!(
            TokenService::refresh(&db, &access).await,
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_revoke_requires_ownership() {
        let refresh = jwt::generate_refresh_token(1).unwrap();
        let owner = stored_user(1, "Secret123", true);
        let stranger = stored_user(2, "Other1234", true);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![owner]])
            .into_connection();

        assert!(matches!(
            TokenService::revoke(&db, &stranger, &refresh).await,
            Err(ApiError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_revoke_malformed_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let caller = stored_user(1, "Secret123", true);

        assert!(matches!(
            TokenService::revoke(&db, &caller, "not.a.token").await,
            Err(ApiError::BadRequest(_))
        ));
    }
}
