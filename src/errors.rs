use std::collections::BTreeMap;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use thiserror::Error;

/// Taxonomie d'erreurs de l'API. Chaque handler retourne Result<_, ApiError>
/// et la traduction erreur -> status HTTP se fait à un seul endroit,
/// dans l'impl ResponseError ci-dessous.
#[derive(Debug, Error)]
pub enum ApiError {
    // Erreurs de validation accumulées par champ (400)
    #[error("Validation error")]
    Validation(BTreeMap<String, Vec<String>>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    // Violation d'unicité détectée par la base (course entre la
    // pré-vérification et l'insert)
    #[error("{0}")]
    Conflict(String),

    // Le détail part dans les logs, jamais dans la réponse
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(field: &str, message: &str) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), vec![message.to_string()]);
        ApiError::Validation(errors)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(details) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Validation error",
                    "details": details
                }))
            }
            ApiError::Internal(detail) => {
                log::error!("internal error: {}", detail);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
            other => HttpResponse::build(self.status_code()).json(serde_json::json!({
                "error": other.to_string()
            })),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            details.insert(field.to_string(), messages);
        }
        ApiError::Validation(details)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        // Les courses sur contrainte unique remontent en Conflict,
        // tout le reste est une erreur interne
        let text = err.to_string();
        if text.contains("duplicate key") {
            ApiError::Conflict("Resource already exists".to_string())
        } else {
            ApiError::Internal(text)
        }
    }
}
