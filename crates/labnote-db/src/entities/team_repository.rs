//! TeamRepository entity: a repository shared with another team

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::repository::PermissionLevel;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_repositories")]
pub struct Model {
    /// Shared repository (composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub repository_id: Uuid,

    /// Team receiving access (composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub team_id: Uuid,

    /// Grade granted to this team
    pub permission_level: PermissionLevel,

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

    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Team,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
