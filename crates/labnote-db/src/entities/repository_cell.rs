//! RepositoryCell entity: the value of one custom column on one row

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repository_cells")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub row_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub column_id: Uuid,

    /// Display value of the cell
    #[sea_orm(column_type = "Text")]
    pub value: String,

    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repository_row::Entity",
        from = "Column::RowId",
        to = "super::repository_row::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Row,

    #[sea_orm(
        belongs_to = "super::repository_column::Entity",
        from = "Column::ColumnId",
        to = "super::repository_column::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    RepositoryColumn,
}

impl Related<super::repository_row::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Row.def()
    }
}

impl Related<super::repository_column::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RepositoryColumn.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
