//! Team entity, the tenant boundary owning projects and repositories

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    /// Team UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Team name
    pub name: String,

    /// User who created the team
    pub created_by: Uuid,

    /// When the team was created
    pub created_at: ChronoDateTimeUtc,

    /// When the team was last updated
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Team was created by a user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Creator,

    /// Team has members
    #[sea_orm(has_many = "super::team_member::Entity")]
    Members,

    /// Team owns projects
    #[sea_orm(has_many = "super::project::Entity")]
    Projects,

    /// Team owns repositories
    #[sea_orm(has_many = "super::repository::Entity")]
    Repositories,

    /// Repositories other teams shared with this team
    #[sea_orm(has_many = "super::team_repository::Entity")]
    SharedRepositories,
}

impl Related<super::team_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repositories.def()
    }
}

impl Related<super::team_repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SharedRepositories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
