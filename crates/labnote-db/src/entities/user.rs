//! User entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// User UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// User email (unique)
    #[sea_orm(unique)]
    pub email: String,

    /// Full name, searched when matching repository rows by creator
    pub full_name: Option<String>,

    /// When the user account was created
    pub created_at: ChronoDateTimeUtc,

    /// When the user last updated their profile
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// User is a member of teams
    #[sea_orm(has_many = "super::team_member::Entity")]
    TeamMemberships,

    /// User is linked to projects
    #[sea_orm(has_many = "super::user_project::Entity")]
    ProjectLinks,

    /// Rows created by the user
    #[sea_orm(has_many = "super::repository_row::Entity")]
    CreatedRows,
}

impl Related<super::team_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMemberships.def()
    }
}

impl Related<super::user_project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectLinks.def()
    }
}

impl Related<super::repository_row::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedRows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
