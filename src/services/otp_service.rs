use sea_orm::*;
use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::one_time_passwords::{
    self as otp, STATUS_ACTIVE, STATUS_CONSUMED, STATUS_EXPIRED,
};
use crate::models::users;
use crate::services::user_service::UserService;

/// Résultat d'une émission. Le code part par un canal externe (email),
/// il ne doit JAMAIS être sérialisé dans la réponse HTTP de production.
pub struct IssuedOtp {
    pub token: Uuid,
    pub code: i32,
}

/// Échecs de vérification, dans l'ordre d'évaluation.
/// Le premier échec gagne, aucune agrégation.
#[derive(Debug, PartialEq)]
pub enum VerificationFailure {
    Ownership,
    NotActive,
    CodeMismatch,
}

fn otp_ttl_minutes() -> i64 {
    std::env::var("OTP_TTL_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(2)
}

pub struct OtpService;

impl OtpService {
    /// Émet un nouveau code pour un utilisateur.
    /// Préconditions: compte actif et pas encore vérifié.
    pub async fn issue(
        db: &DatabaseConnection,
        user: &users::Model,
    ) -> Result<IssuedOtp, ApiError> {
        if !user.is_active {
            return Err(ApiError::BadRequest("User is not active".to_string()));
        }
        if user.is_verified {
            return Err(ApiError::BadRequest(
                "Account is already verified".to_string(),
            ));
        }

        // Code 6 chiffres uniforme sur [100000, 999999]; pas d'unicité sur
        // le code lui-même, le lookup passe toujours par le token
        let code = rand::thread_rng().gen_range(100000..=999999);
        let token = Uuid::new_v4();
        let created = Utc::now();
        let expiration = created + chrono::Duration::minutes(otp_ttl_minutes());

        let new_otp = otp::ActiveModel {
            user_id: Set(user.id),
            token: Set(token),
            code: Set(code),
            status: Set(STATUS_ACTIVE.to_string()),
            created: Set(created),
            expiration: Set(expiration),
            ..Default::default()
        };

        new_otp.insert(db).await?;

        Ok(IssuedOtp { token, code })
    }

    /// Vérifications pures sur un code déjà chargé, dans l'ordre:
    /// ownership, status recalculé paresseusement, égalité numérique du code.
    /// Le code soumis arrive en string et se compare en entier, donc
    /// "012345" et "12345" sont le même code.
    pub fn check_verification(
        otp_row: &otp::Model,
        caller_id: i32,
        now: chrono::DateTime<Utc>,
        submitted_code: &str,
    ) -> Result<(), VerificationFailure> {
        if otp_row.user_id != caller_id {
            return Err(VerificationFailure::Ownership);
        }

        if otp_row.effective_status(now) != STATUS_ACTIVE {
            return Err(VerificationFailure::NotActive);
        }

        let submitted: i32 = match submitted_code.trim().parse() {
            Ok(value) => value,
            Err(_) => return Err(VerificationFailure::CodeMismatch),
        };

        if submitted != otp_row.code {
            return Err(VerificationFailure::CodeMismatch);
        }

        Ok(())
    }

    /// Vérifie un code soumis contre un token.
    /// Succès: is_verified = true et status = CON dans la même transaction.
    pub async fn verify(
        db: &DatabaseConnection,
        caller_id: i32,
        token: &str,
        submitted_code: &str,
    ) -> Result<(), ApiError> {
        // 1. Lookup par token
        let parsed = Uuid::parse_str(token)
            .map_err(|_| ApiError::BadRequest("Invalid token".to_string()))?;

        let otp_row = otp::Entity::find()
            .filter(otp::Column::Token.eq(parsed))
            .one(db)
            .await?
            .ok_or_else(|| ApiError::BadRequest("Invalid token".to_string()))?;

        let now = Utc::now();

        // 2-4. Ownership, expiration, code
        match Self::check_verification(&otp_row, caller_id, now, submitted_code) {
            Ok(()) => {}
            Err(VerificationFailure::Ownership) => {
                return Err(ApiError::Forbidden(
                    "You do not own this OTP token".to_string(),
                ));
            }
            Err(VerificationFailure::NotActive) => {
                // Expiration constatée paresseusement: on persiste le flip
                if otp_row.status == STATUS_ACTIVE {
                    let mut expired: otp::ActiveModel = otp_row.into();
                    expired.status = Set(STATUS_EXPIRED.to_string());
                    expired.update(db).await?;
                }
                return Err(ApiError::BadRequest("OTP is expired".to_string()));
            }
            Err(VerificationFailure::CodeMismatch) => {
                return Err(ApiError::BadRequest("Invalid OTP code".to_string()));
            }
        }

        // 5. Succès: flag du user + consommation du code, transactionnel
        let txn = db.begin().await?;

        let user = users::Entity::find_by_id(otp_row.user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ApiError::BadRequest("Invalid token".to_string()))?;

        UserService::set_verified(&txn, user).await?;

        let mut consumed: otp::ActiveModel = otp_row.into();
        consumed.status = Set(STATUS_CONSUMED.to_string());
        consumed.update(&txn).await?;

        txn.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn otp_row(user_id: i32, code: i32, status: &str) -> otp::Model {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        otp::Model {
            id: 1,
            user_id,
            token: Uuid::new_v4(),
            code,
            status: status.to_string(),
            created,
            expiration: created + Duration::minutes(2),
        }
    }

    #[test]
    fn test_ownership_checked_before_expiry() {
        let row = otp_row(42, 123456, STATUS_ACTIVE);
        // Mauvais owner ET expiré: l'ownership gagne
        let now = row.expiration + Duration::minutes(5);
        assert_eq!(
            OtpService::check_verification(&row, 7, now, "123456"),
            Err(VerificationFailure::Ownership)
        );
    }

    #[test]
    fn test_expired_at_boundary() {
        let row = otp_row(42, 123456, STATUS_ACTIVE);
        let now = row.expiration;
        assert_eq!(
            OtpService::check_verification(&row, 42, now, "123456"),
            Err(VerificationFailure::NotActive)
        );
    }

    #[test]
    fn test_consumed_code_cannot_be_replayed() {
        let row = otp_row(42, 123456, STATUS_CONSUMED);
        // Avant expiration, code correct: le replay échoue quand même
        let now = row.created + Duration::seconds(30);
        assert_eq!(
            OtpService::check_verification(&row, 42, now, "123456"),
            Err(VerificationFailure::NotActive)
        );
    }

    #[test]
    fn test_wrong_code_rejected() {
        let row = otp_row(42, 123456, STATUS_ACTIVE);
        let now = row.created + Duration::seconds(30);
        assert_eq!(
            OtpService::check_verification(&row, 42, now, "654321"),
            Err(VerificationFailure::CodeMismatch)
        );
    }

    #[test]
    fn test_unparseable_code_rejected() {
        let row = otp_row(42, 123456, STATUS_ACTIVE);
        let now = row.created + Duration::seconds(30);
        assert_eq!(
            OtpService::check_verification(&row, 42, now, "abc"),
            Err(VerificationFailure::CodeMismatch)
        );
    }

    #[test]
    fn test_code_compared_numerically() {
        let row = otp_row(42, 123456, STATUS_ACTIVE);
        let now = row.created + Duration::seconds(30);
        // Zéros en tête: comparaison par valeur, pas lexicale
        assert_eq!(
            OtpService::check_verification(&row, 42, now, "0123456"),
            Ok(())
        );
    }

    #[test]
    fn test_all_checks_pass() {
        let row = otp_row(42, 123456, STATUS_ACTIVE);
        let now = row.created + Duration::seconds(30);
        assert_eq!(
            OtpService::check_verification(&row, 42, now, "123456"),
            Ok(())
        );
    }

    fn user(is_active: bool, is_verified: bool) -> users::Model {
        users::Model {
            id: 42,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            full_name: "Alice Doe".to_string(),
            password_hash: String::new(),
            is_verified,
            is_active,
            is_admin: false,
            joined_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_issue_rejects_already_verified_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        match OtpService::issue(&db, &user(true, true)).await {
            Err(ApiError::BadRequest(message)) => {
                assert_eq!(message, "Account is already verified")
            }
            other => panic!("expected BadRequest, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_issue_rejects_inactive_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        match OtpService::issue(&db, &user(false, false)).await {
            Err(ApiError::BadRequest(message)) => assert_eq!(message, "User is not active"),
            other => panic!("expected BadRequest, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_verify_unknown_token_is_invalid() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<otp::Model>::new()])
            .into_connection();

        let token = Uuid::new_v4().to_string();
        match OtpService::verify(&db, 42, &token, "123456").await {
            Err(ApiError::BadRequest(message)) => assert_eq!(message, "Invalid token"),
            other => panic!("expected BadRequest, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_verify_malformed_token_is_invalid() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        match OtpService::verify(&db, 42, "not-a-uuid", "123456").await {
            Err(ApiError::BadRequest(message)) => assert_eq!(message, "Invalid token"),
            other => panic!("expected BadRequest, got {:?}", other.err()),
        }
    }
}
