//! RepositoryColumn entity: a typed custom column of a repository

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Data type of a custom column
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    #[sea_orm(string_value = "text")]
    Text,
    #[sea_orm(string_value = "number")]
    Number,
    #[sea_orm(string_value = "list")]
    List,
    #[sea_orm(string_value = "checklist")]
    Checklist,
    #[sea_orm(string_value = "status")]
    Status,
    #[sea_orm(string_value = "date")]
    Date,
    #[sea_orm(string_value = "date_time")]
    DateTime,
    #[sea_orm(string_value = "asset")]
    Asset,
}

impl ColumnKind {
    /// Whether cell values of this kind take part in row search.
    pub fn is_extra_searchable(self) -> bool {
        matches!(
            self,
            ColumnKind::Text
                | ColumnKind::Number
                | ColumnKind::List
                | ColumnKind::Checklist
                | ColumnKind::Status
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repository_columns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub repository_id: Uuid,

    pub name: String,

    pub kind: ColumnKind,

    pub created_at: ChronoDateTimeUtc,
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

    #[sea_orm(has_many = "super::repository_cell::Entity")]
    Cells,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl Related<super::repository_cell::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cells.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
