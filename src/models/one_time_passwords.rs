// ============================================================================
// MODÈLE : ONE TIME PASSWORDS
// ============================================================================
//
// Description:
//   Modèle de la table one_time_passwords correspondant EXACTEMENT
//   à la structure SQL créée par la migration.
//
// Colonnes de la table one_time_passwords:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - user_id (INTEGER, NOT NULL, FK vers users)
//   - token (UUID, UNIQUE, NOT NULL) - handle de lookup, distinct du code
//   - code (INTEGER, NOT NULL) - 6 chiffres, uniforme sur [100000, 999999]
//   - status (VARCHAR(3), NOT NULL) - 'ACT', 'EXP' ou 'CON'
//   - created (TIMESTAMPTZ, NOT NULL)
//   - expiration (TIMESTAMPTZ, NOT NULL) - created + OTP_TTL_MINUTES
//
// Workflow:
//   1. User authentifié appelle GET /accounts/generate-otp
//   2. Backend génère un code 6 chiffres + un token UUID v4, status = ACT
//   3. Le code part par un canal externe (email), jamais dans la réponse HTTP
//   4. User soumet le code via POST /accounts/account-verification/{token}
//   5. Backend vérifie: token existe, caller = owner, status ACT, code égal
//   6. Backend met users.is_verified = true et status = CON (même transaction)
//
// Points d'attention:
//   - Le status est recalculé paresseusement à la lecture (expiration <= now),
//     jamais par un sweep en arrière-plan
//   - Un code consommé (CON) ne peut pas être rejoué
//   - L'unicité porte sur le token, pas sur le code (collisions de codes
//     entre tokens différents permises, le lookup passe toujours par le token)
//   - ON DELETE CASCADE: si user supprimé, ses OTP sont supprimés aussi
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const STATUS_ACTIVE: &str = "ACT";
pub const STATUS_EXPIRED: &str = "EXP";
pub const STATUS_CONSUMED: &str = "CON";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "one_time_passwords")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    #[sea_orm(unique)]
    pub token: Uuid,

    pub code: i32,

    pub status: String,

    pub created: DateTimeUtc,

    pub expiration: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Status effectif du code, recalculé paresseusement.
    /// Un code déjà consommé reste CON; sinon expiration <= now donne EXP.
    pub fn effective_status(&self, now: DateTimeUtc) -> &'static str {
        if self.status == STATUS_CONSUMED {
            STATUS_CONSUMED
        } else if self.expiration <= now {
            STATUS_EXPIRED
        } else {
            STATUS_ACTIVE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn otp_at(created: DateTimeUtc, ttl_minutes: i64, status: &str) -> Model {
        Model {
            id: 1,
            user_id: 42,
            token: Uuid::new_v4(),
            code: 123456,
            status: status.to_string(),
            created,
            expiration: created + chrono::Duration::minutes(ttl_minutes),
        }
    }

    #[test]
    fn test_active_before_expiration() {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let otp = otp_at(created, 2, STATUS_ACTIVE);
        let now = created + chrono::Duration::seconds(119);
        assert_eq!(otp.effective_status(now), STATUS_ACTIVE);
    }

    #[test]
    fn test_expired_exactly_at_expiration() {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let otp = otp_at(created, 2, STATUS_ACTIVE);
        let now = otp.expiration;
        assert_eq!(otp.effective_status(now), STATUS_EXPIRED);
    }

    #[test]
    fn test_expired_after_expiration() {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let otp = otp_at(created, 2, STATUS_ACTIVE);
        let now = created + chrono::Duration::minutes(10);
        assert_eq!(otp.effective_status(now), STATUS_EXPIRED);
    }

    #[test]
    fn test_consumed_stays_consumed() {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let otp = otp_at(created, 2, STATUS_CONSUMED);
        // Même pas encore expiré, un code consommé reste consommé
        let now = created + chrono::Duration::seconds(30);
        assert_eq!(otp.effective_status(now), STATUS_CONSUMED);
    }
}
