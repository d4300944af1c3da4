use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::errors::ApiError;
use crate::middleware::AuthUser;
use crate::services::otp_service::OtpService;
use crate::services::user_service::UserService;

// DTO pour la soumission du code. Le code arrive en string et la
// comparaison se fait en entier (zéros en tête sans effet)
#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub code: String,
}

/// GET|POST /accounts/generate-otp - Émettre un code OTP (PROTÉGÉE)
/// Le code part par email (collaborateur externe), la réponse ne
/// contient que le token de lookup
pub async fn generate_otp(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let caller = UserService::require_caller(db.get_ref(), auth_user.user_id).await?;

    let issued = OtpService::issue(db.get_ref(), &caller).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "OTP sent successfully",
        "otp": { "token": issued.token }
    })))
}

/// POST /accounts/account-verification/{token} - Vérifier le compte (PROTÉGÉE)
#[post("/account-verification/{token}")]
pub async fn account_verification(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<VerifyOtpRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let token = path.into_inner();

    OtpService::verify(db.get_ref(), auth_user.user_id, &token, &body.code).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Account verified successfully"
    })))
}

pub fn accounts_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/accounts")
            .route("/generate-otp", web::get().to(generate_otp))
            .route("/generate-otp", web::post().to(generate_otp))
            .service(account_verification)
    );
}
