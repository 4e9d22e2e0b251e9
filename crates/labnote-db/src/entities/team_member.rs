//! TeamMember entity for team membership and roles

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a team member
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    /// Team owner (administrator) with full access to every team resource
    #[sea_orm(string_value = "owner")]
    Owner,

    /// Regular team member
    #[sea_orm(string_value = "member")]
    Member,

    /// Read-only guest
    #[sea_orm(string_value = "guest")]
    Guest,
}

impl TeamRole {
    /// Whether this is the highest-privilege role of a team.
    pub fn is_admin(self) -> bool {
        matches!(self, TeamRole::Owner)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_members")]
pub struct Model {
    /// Team UUID (composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub team_id: Uuid,

    /// User UUID (composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,

    /// Role of the user in this team
    pub role: TeamRole,

    /// When the user joined the team
    pub joined_at: ChronoDateTimeUtc,
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

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
