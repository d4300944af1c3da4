use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String, // Max 12 caractères, validé à l'inscription
    #[sea_orm(unique)]
    pub email: String, // Toujours stocké en minuscules
    pub full_name: String,
    #[serde(skip_serializing)] // Ne jamais exposer le hash en JSON
    pub password_hash: String, // Format: pbkdf2_sha256$iterations$salt$hash
    pub is_verified: bool,
    pub is_active: bool,
    pub is_admin: bool,
    pub joined_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::one_time_passwords::Entity")]
    OneTimePasswords,

    #[sea_orm(has_one = "super::profiles::Entity")]
    Profile,

    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,
}

impl Related<super::one_time_passwords::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OneTimePasswords.def()
    }
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Tous les admins sont staff (réponse la plus simple possible)
    pub fn is_staff(&self) -> bool {
        self.is_admin
    }
}
