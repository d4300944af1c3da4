use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

pub const TASK_PENDING: &str = "PEN";
pub const TASK_COMPLETED: &str = "COM";
pub const TASK_EXPIRED: &str = "EXP";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    // Slug unique pour accéder à la tâche dans l'URL
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
    pub status: String, // 'PEN', 'COM', 'EXP'
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub dead_line: DateTimeUtc,
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
