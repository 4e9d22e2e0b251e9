//! Visibility policy evaluator.
//!
//! Pure predicates over already-loaded records. Callers must pass records
//! read for the current request; nothing here caches authorization state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Principal, ProjectRecord, RepositoryRecord};
use labnote_db::entities::{project::Visibility, user_project::ProjectRole};

/// Both repository predicates for one team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryAccess {
    pub visible: bool,
    /// Write access through sharing; false for the owning team
    pub writable: bool,
}

impl RepositoryAccess {
    pub const NONE: RepositoryAccess = RepositoryAccess {
        visible: false,
        writable: false,
    };
}

/// True iff the user's role in `team_id` is the highest-privilege role.
pub fn is_admin_of_team(principal: &Principal, team_id: Uuid) -> bool {
    principal
        .role_in(team_id)
        .map(|role| role.is_admin())
        .unwrap_or(false)
}

/// Team owners see every project of their team; everyone else sees visible
/// projects and projects they are explicitly linked to.
pub fn project_visible(principal: &Principal, project: &ProjectRecord) -> bool {
    is_admin_of_team(principal, project.team_id)
        || project.visibility == Visibility::Visible
        || project.member(principal.user_id).is_some()
}

/// Team owners and project owners may manage a project.
pub fn project_manageable(principal: &Principal, project: &ProjectRecord) -> bool {
    is_admin_of_team(principal, project.team_id)
        || project
            .member(principal.user_id)
            .is_some_and(|m| m.role == Some(ProjectRole::Owner))
}

/// Owning team, a sharing link to the team, or a global shared level.
///
/// Links are only ever stored at a shared level, so any link grants visibility.
pub fn repository_visible(team_id: Uuid, repository: &RepositoryRecord) -> bool {
    repository.team_id == team_id
        || repository.share_for(team_id).is_some()
        || repository.permission_level.is_shared()
}

/// Write access granted through sharing.
///
/// Returns false for the owning team: ownership implies full access and has
/// to be checked by the caller before consulting this predicate.
pub fn repository_writable(team_id: Uuid, repository: &RepositoryRecord) -> bool {
    if repository.team_id == team_id {
        return false;
    }

    repository
        .share_for(team_id)
        .is_some_and(|s| s.permission_level.is_writable())
        || repository.permission_level.is_writable()
}

/// Both repository predicates for `team_id`, same-team quirk included.
pub fn repository_access(team_id: Uuid, repository: &RepositoryRecord) -> RepositoryAccess {
    RepositoryAccess {
        visible: repository_visible(team_id, repository),
        writable: repository_writable(team_id, repository),
    }
}

/// Visible to at least one of the given teams.
pub fn repository_visible_to_any(team_ids: &[Uuid], repository: &RepositoryRecord) -> bool {
    team_ids
        .iter()
        .any(|team_id| repository_visible(*team_id, repository))
}
