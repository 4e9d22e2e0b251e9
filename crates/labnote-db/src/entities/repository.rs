//! Repository (inventory) entity, owned by exactly one team

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sharing grade of a repository, used both globally and on per-team links
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// Not shared outside the owning team
    #[sea_orm(string_value = "not_shared")]
    Private,

    /// Shared for reading
    #[sea_orm(string_value = "shared_read")]
    SharedRead,

    /// Shared for reading and writing
    #[sea_orm(string_value = "shared_write")]
    SharedWrite,
}

impl PermissionLevel {
    pub fn is_shared(self) -> bool {
        !matches!(self, PermissionLevel::Private)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, PermissionLevel::SharedWrite)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repositories")]
pub struct Model {
    /// Repository UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning team
    pub team_id: Uuid,

    /// Repository name
    pub name: String,

    /// Global sharing grade (applies to every team)
    pub permission_level: PermissionLevel,

    /// Soft-delete flag
    pub archived: bool,

    /// When the repository was archived
    pub archived_on: Option<ChronoDateTimeUtc>,

    /// User who created the repository
    pub created_by: Uuid,

    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Team,

    /// Per-team sharing links
    #[sea_orm(has_many = "super::team_repository::Entity")]
    Shares,

    #[sea_orm(has_many = "super::repository_column::Entity")]
    Columns,

    #[sea_orm(has_many = "super::repository_row::Entity")]
    Rows,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::team_repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shares.def()
    }
}

impl Related<super::repository_column::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Columns.def()
    }
}

impl Related<super::repository_row::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
