// ============================================================================
// MODÈLE : TOKEN BLACKLIST
// ============================================================================
//
// Description:
//   Liste de révocation des refresh tokens. Chaque refresh token porte un
//   claim jti (UUID); le logout insère ce jti ici et tout usage ultérieur
//   du token est rejeté même si la signature est encore valide.
//
// Colonnes de la table token_blacklist:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - jti (UUID, UNIQUE, NOT NULL)
//   - user_id (INTEGER, NOT NULL, FK vers users)
//   - blacklisted_at (TIMESTAMPTZ, NOT NULL)
//
// Points d'attention:
//   - La révocation est par token (par jti), pas par user: un user peut
//     garder d'autres sessions valides après un logout
//   - Les access tokens ne sont pas révocables, ils expirent naturellement
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "token_blacklist")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub jti: Uuid,

    pub user_id: i32,

    pub blacklisted_at: DateTimeUtc,
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
