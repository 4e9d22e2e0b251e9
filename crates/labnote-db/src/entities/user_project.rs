//! UserProject entity linking users to projects

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project-level role carried on a user link
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    #[sea_orm(string_value = "owner")]
    Owner,

    #[sea_orm(string_value = "normal")]
    Normal,

    #[sea_orm(string_value = "technician")]
    Technician,

    #[sea_orm(string_value = "viewer")]
    Viewer,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_projects")]
pub struct Model {
    /// Project UUID (composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_id: Uuid,

    /// User UUID (composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,

    /// Optional project-level role
    pub role: Option<ProjectRole>,

    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Project,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
