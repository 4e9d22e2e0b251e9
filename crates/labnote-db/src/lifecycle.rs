//! Explicit update operations on projects and repositories.
//!
//! Visibility and sharing flags only change through these functions; the
//! search core reads them and never writes.

use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    Set,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{project, repository::PermissionLevel, team_repository};

/// Soft-delete a project, stamping the archive time.
pub async fn archive_project<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
) -> Result<project::Model, DbErr> {
    let found = project::Entity::find_by_id(project_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("project {}", project_id)))?;

    if found.archived {
        return Ok(found);
    }

    let now = Utc::now();
    let mut active = found.into_active_model();
    active.archived = Set(true);
    active.archived_on = Set(Some(now));
    active.updated_at = Set(now);

    let updated = active.update(db).await?;
    info!("Archived project {}", project_id);
    Ok(updated)
}

/// Restore an archived project.
pub async fn restore_project<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
) -> Result<project::Model, DbErr> {
    let found = project::Entity::find_by_id(project_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("project {}", project_id)))?;

    let mut active = found.into_active_model();
    active.archived = Set(false);
    active.archived_on = Set(None);
    active.updated_at = Set(Utc::now());
    active.update(db).await
}

pub async fn set_project_visibility<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    visibility: project::Visibility,
) -> Result<project::Model, DbErr> {
    let found = project::Entity::find_by_id(project_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("project {}", project_id)))?;

    let mut active = found.into_active_model();
    active.visibility = Set(visibility);
    active.updated_at = Set(Utc::now());
    active.update(db).await
}

/// Share a repository with a team, replacing any existing link's level.
///
/// A link always grants visibility, so `Private` is rejected; use
/// [`unshare_repository`] to revoke access.
pub async fn share_repository<C: ConnectionTrait>(
    db: &C,
    repository_id: Uuid,
    team_id: Uuid,
    level: PermissionLevel,
) -> Result<(), DbErr> {
    if !level.is_shared() {
        return Err(DbErr::Custom(format!(
            "Cannot share repository {} at level {:?}",
            repository_id, level
        )));
    }

    let link = team_repository::ActiveModel {
        repository_id: Set(repository_id),
        team_id: Set(team_id),
        permission_level: Set(level),
        created_at: Set(Utc::now()),
    };

    team_repository::Entity::insert(link)
        .on_conflict(
            OnConflict::columns([
                team_repository::Column::RepositoryId,
                team_repository::Column::TeamId,
            ])
            .update_column(team_repository::Column::PermissionLevel)
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    info!(
        "Shared repository {} with team {} ({:?})",
        repository_id, team_id, level
    );
    Ok(())
}

/// Remove a sharing link. Returns whether a link existed.
pub async fn unshare_repository<C: ConnectionTrait>(
    db: &C,
    repository_id: Uuid,
    team_id: Uuid,
) -> Result<bool, DbErr> {
    let result = team_repository::Entity::delete_by_id((repository_id, team_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}
