//! Project entity, owned by exactly one team

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Default access of non-member users to a project
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Only team owners and linked members can see the project
    #[sea_orm(string_value = "hidden")]
    Hidden,

    /// Every member of the owning team can see the project
    #[sea_orm(string_value = "visible")]
    Visible,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Project UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning team
    pub team_id: Uuid,

    /// Project name
    pub name: String,

    /// Visibility to non-member users of the owning team
    pub visibility: Visibility,

    /// Soft-delete flag
    pub archived: bool,

    /// When the project was archived
    pub archived_on: Option<ChronoDateTimeUtc>,

    /// User who created the project
    pub created_by: Uuid,

    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Project belongs to a team
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Team,

    /// Explicit user links
    #[sea_orm(has_many = "super::user_project::Entity")]
    Members,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::user_project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
