//! RepositoryRow entity: one inventory item

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Prefix of the human-facing row identifier (`IT42`)
pub const ID_PREFIX: &str = "IT";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repository_rows")]
pub struct Model {
    /// Numeric row id (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Repository the row belongs to
    pub repository_id: Uuid,

    /// Row name
    pub name: String,

    /// User who created the row
    pub created_by: Uuid,

    pub archived: bool,
    pub archived_on: Option<ChronoDateTimeUtc>,

    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

impl Model {
    /// Human-facing identifier, e.g. `IT42`.
    pub fn prefixed_id(&self) -> String {
        format!("{}{}", ID_PREFIX, self.id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repository::Entity",
        from = "Column::RepositoryId",
        to = "super::repository::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Repository,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Creator,

    #[sea_orm(has_many = "super::repository_cell::Entity")]
    Cells,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::repository_cell::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cells.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
