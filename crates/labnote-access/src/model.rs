//! Read models the policy and search code operate on.
//!
//! Each record is a resource plus the relations the access rules need,
//! loaded together by a [`crate::SearchStore`].

use chrono::{DateTime, Utc};
use labnote_db::entities::{
    project, repository, repository_column::ColumnKind, repository_row, team_member::TeamRole,
    user_project::ProjectRole,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's role in one team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub team_id: Uuid,
    pub role: TeamRole,
}

/// The authenticated user making a request, with current memberships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub memberships: Vec<Membership>,
}

impl Principal {
    pub fn new(user_id: Uuid, memberships: Vec<Membership>) -> Self {
        Self {
            user_id,
            full_name: None,
            memberships,
        }
    }

    pub fn role_in(&self, team_id: Uuid) -> Option<TeamRole> {
        self.memberships
            .iter()
            .find(|m| m.team_id == team_id)
            .map(|m| m.role)
    }

    pub fn is_member_of(&self, team_id: Uuid) -> bool {
        self.role_in(team_id).is_some()
    }

    /// Teams the user belongs to, in membership order.
    pub fn team_ids(&self) -> Vec<Uuid> {
        self.memberships.iter().map(|m| m.team_id).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMember {
    pub user_id: Uuid,
    pub role: Option<ProjectRole>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub visibility: project::Visibility,
    pub archived: bool,
    pub archived_on: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Explicit user links
    pub members: Vec<ProjectMember>,
}

impl ProjectRecord {
    pub fn from_model(model: project::Model, members: Vec<ProjectMember>) -> Self {
        Self {
            id: model.id,
            team_id: model.team_id,
            name: model.name,
            visibility: model.visibility,
            archived: model.archived,
            archived_on: model.archived_on,
            created_at: model.created_at,
            members,
        }
    }

    pub fn member(&self, user_id: Uuid) -> Option<&ProjectMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }
}

/// A per-team sharing link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryShare {
    pub team_id: Uuid,
    pub permission_level: repository::PermissionLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub permission_level: repository::PermissionLevel,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub shares: Vec<RepositoryShare>,
}

impl RepositoryRecord {
    pub fn from_model(model: repository::Model, shares: Vec<RepositoryShare>) -> Self {
        Self {
            id: model.id,
            team_id: model.team_id,
            name: model.name,
            permission_level: model.permission_level,
            archived: model.archived,
            created_at: model.created_at,
            shares,
        }
    }

    pub fn share_for(&self, team_id: Uuid) -> Option<&RepositoryShare> {
        self.shares.iter().find(|s| s.team_id == team_id)
    }
}

/// A custom cell value together with its column type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub column_id: Uuid,
    pub kind: ColumnKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRecord {
    pub id: i32,
    pub repository_id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    /// Full name of the creator, if known
    pub creator_name: Option<String>,
    pub archived: bool,
    pub archived_on: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub cells: Vec<CellRecord>,
}

impl RowRecord {
    pub fn from_model(
        model: repository_row::Model,
        creator_name: Option<String>,
        cells: Vec<CellRecord>,
    ) -> Self {
        Self {
            id: model.id,
            repository_id: model.repository_id,
            name: model.name,
            created_by: model.created_by,
            creator_name,
            archived: model.archived,
            archived_on: model.archived_on,
            created_at: model.created_at,
            cells,
        }
    }

    /// Human-facing identifier, e.g. `IT42`.
    pub fn prefixed_id(&self) -> String {
        format!("{}{}", repository_row::ID_PREFIX, self.id)
    }
}
