use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::utils::jwt;

/// Structure qui contient les infos de l'utilisateur authentifié
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub email: String,
}

/// Implémentation de FromRequest pour AuthUser
/// Cela permet à Actix-Web d'extraire automatiquement AuthUser des requêtes;
/// les échecs passent par ApiError pour garder la traduction
/// erreur -> status centralisée
impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Extraire le header Authorization
        let auth_header = match req.headers().get("Authorization") {
            Some(header) => header,
            None => {
                return ready(Err(ApiError::Unauthorized(
                    "Missing Authorization header".to_string(),
                )));
            }
        };

        // 2. Convertir le header en string
        let auth_str = match auth_header.to_str() {
            Ok(s) => s,
            Err(_) => {
                return ready(Err(ApiError::Unauthorized(
                    "Invalid Authorization header".to_string(),
                )));
            }
        };

        // 3. Extraire le token (format: "Bearer <token>")
        let token = if auth_str.starts_with("Bearer ") {
            &auth_str[7..]
        } else {
            return ready(Err(ApiError::Unauthorized(
                "Invalid Authorization format (expected: Bearer <token>)".to_string(),
            )));
        };

        // 4. Vérifier le token JWT (les refresh tokens sont refusés ici)
        let claims = match jwt::verify_access_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                return ready(Err(ApiError::Unauthorized(format!("Invalid token: {}", e))));
            }
        };

        // 5. Créer et retourner AuthUser
        ready(Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
        }))
    }
}

/// Variante optionnelle: Some si un Bearer token valide est présent,
/// None sinon. Sert au refus de re-login d'un caller déjà authentifié.
pub fn maybe_auth_user(req: &HttpRequest) -> Option<AuthUser> {
    let auth_str = req.headers().get("Authorization")?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;
    let claims = jwt::verify_access_token(token).ok()?;

    Some(AuthUser {
        user_id: claims.sub,
        username: claims.username,
        email: claims.email,
    })
}
