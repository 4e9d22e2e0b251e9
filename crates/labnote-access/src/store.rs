//! Data-store boundary of the search core.
//!
//! Every call reads current state; implementations must not cache
//! memberships or visibility flags across calls.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{AccessError, AccessResult};
use crate::model::{
    CellRecord, Membership, Principal, ProjectMember, ProjectRecord, RepositoryRecord,
    RepositoryShare, RowRecord,
};
use crate::rows::{RowQuery, TextFilter};
use labnote_db::entities::{
    project, repository, repository::PermissionLevel, repository_cell, repository_column,
    repository_row, team, team_member, team_repository, user, user_project,
};

/// Read access to the records the search core needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Load a user with current team memberships. Missing user is `NotFound`.
    async fn principal(&self, user_id: Uuid) -> AccessResult<Principal>;

    /// Fail with `NotFound` unless the team exists.
    async fn ensure_team(&self, team_id: Uuid) -> AccessResult<()>;

    async fn project(&self, project_id: Uuid) -> AccessResult<ProjectRecord>;

    /// Projects owned by any of `team_ids`, with member links.
    async fn projects_for_teams(&self, team_ids: &[Uuid]) -> AccessResult<Vec<ProjectRecord>>;

    async fn repository(&self, repository_id: Uuid) -> AccessResult<RepositoryRecord>;

    /// Superset of the repositories `team_ids` can reach: owned, linked, or
    /// globally shared. The caller applies the exact policy.
    async fn repository_candidates(&self, team_ids: &[Uuid])
        -> AccessResult<Vec<RepositoryRecord>>;

    /// Rows of the query's repositories with creator names and cell values.
    ///
    /// May return rows failing the query's text filter, never drops one
    /// passing it.
    async fn rows_for_repositories(&self, query: &RowQuery) -> AccessResult<Vec<RowRecord>>;
}

/// [`SearchStore`] backed by a sea-orm connection
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn members_by_project(
        &self,
        project_ids: Vec<Uuid>,
    ) -> AccessResult<HashMap<Uuid, Vec<ProjectMember>>> {
        let mut members: HashMap<Uuid, Vec<ProjectMember>> = HashMap::new();
        if project_ids.is_empty() {
            return Ok(members);
        }

        let links = user_project::Entity::find()
            .filter(user_project::Column::ProjectId.is_in(project_ids))
            .all(&self.db)
            .await?;
        for link in links {
            members
                .entry(link.project_id)
                .or_default()
                .push(ProjectMember {
                    user_id: link.user_id,
                    role: link.role,
                });
        }
        Ok(members)
    }

    async fn shares_by_repository(
        &self,
        repository_ids: Vec<Uuid>,
    ) -> AccessResult<HashMap<Uuid, Vec<RepositoryShare>>> {
        let mut shares: HashMap<Uuid, Vec<RepositoryShare>> = HashMap::new();
        if repository_ids.is_empty() {
            return Ok(shares);
        }

        let links = team_repository::Entity::find()
            .filter(team_repository::Column::RepositoryId.is_in(repository_ids))
            .all(&self.db)
            .await?;
        for link in links {
            shares
                .entry(link.repository_id)
                .or_default()
                .push(RepositoryShare {
                    team_id: link.team_id,
                    permission_level: link.permission_level,
                });
        }
        Ok(shares)
    }

    /// Rows with a searchable field containing one of the filter's terms.
    async fn row_text_condition(
        &self,
        text: &TextFilter,
        kinds: &HashMap<Uuid, repository_column::ColumnKind>,
    ) -> AccessResult<Condition> {
        let mut condition = Condition::any().add(contains_any(repository_row::Column::Name, text));

        for term in &text.terms {
            for pattern in text.id_patterns(term).unwrap_or_default() {
                condition = condition.add(
                    Expr::col(repository_row::Column::Id)
                        .cast_as("TEXT")
                        .like(LikeExpr::new(pattern)),
                );
            }
        }

        let creators: Vec<Uuid> = user::Entity::find()
            .select_only()
            .column(user::Column::Id)
            .filter(contains_any(user::Column::FullName, text))
            .into_tuple()
            .all(&self.db)
            .await?;
        if !creators.is_empty() {
            condition = condition.add(repository_row::Column::CreatedBy.is_in(creators));
        }

        let searchable: Vec<Uuid> = kinds
            .iter()
            .filter(|(_, kind)| kind.is_extra_searchable())
            .map(|(id, _)| *id)
            .collect();
        if !searchable.is_empty() {
            let mut row_ids: Vec<i32> = repository_cell::Entity::find()
                .select_only()
                .column(repository_cell::Column::RowId)
                .filter(repository_cell::Column::ColumnId.is_in(searchable))
                .filter(contains_any(repository_cell::Column::Value, text))
                .into_tuple()
                .all(&self.db)
                .await?;
            row_ids.sort_unstable();
            row_ids.dedup();
            if !row_ids.is_empty() {
                condition = condition.add(repository_row::Column::Id.is_in(row_ids));
            }
        }

        Ok(condition)
    }
}

const LIKE_ESCAPE: char = '!';

/// `column` contains any of the filter's terms, LIKE wildcards taken literally.
fn contains_any<C: ColumnTrait>(column: C, text: &TextFilter) -> Condition {
    text.terms.iter().fold(Condition::any(), |condition, term| {
        let field: SimpleExpr = if text.ignore_case {
            Func::lower(Expr::col(column)).into()
        } else {
            Expr::col(column).into()
        };
        condition.add(field.like(like_contains(term)))
    })
}

fn like_contains(term: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

#[async_trait]
impl SearchStore for SeaOrmStore {
    async fn principal(&self, user_id: Uuid) -> AccessResult<Principal> {
        let found = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AccessError::not_found("User", user_id))?;

        let memberships = team_member::Entity::find()
            .filter(team_member::Column::UserId.eq(user_id))
            .order_by_asc(team_member::Column::JoinedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| Membership {
                team_id: m.team_id,
                role: m.role,
            })
            .collect();

        Ok(Principal {
            user_id,
            full_name: found.full_name,
            memberships,
        })
    }

    async fn ensure_team(&self, team_id: Uuid) -> AccessResult<()> {
        team::Entity::find_by_id(team_id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or_else(|| AccessError::not_found("Team", team_id))
    }

    async fn project(&self, project_id: Uuid) -> AccessResult<ProjectRecord> {
        let found = project::Entity::find_by_id(project_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AccessError::not_found("Project", project_id))?;

        let mut members = self.members_by_project(vec![project_id]).await?;
        Ok(ProjectRecord::from_model(
            found,
            members.remove(&project_id).unwrap_or_default(),
        ))
    }

    async fn projects_for_teams(&self, team_ids: &[Uuid]) -> AccessResult<Vec<ProjectRecord>> {
        if team_ids.is_empty() {
            return Ok(Vec::new());
        }

        let projects = project::Entity::find()
            .filter(project::Column::TeamId.is_in(team_ids.iter().copied()))
            .order_by_asc(project::Column::Id)
            .all(&self.db)
            .await?;

        let mut members = self
            .members_by_project(projects.iter().map(|p| p.id).collect())
            .await?;

        Ok(projects
            .into_iter()
            .map(|p| {
                let links = members.remove(&p.id).unwrap_or_default();
                ProjectRecord::from_model(p, links)
            })
            .collect())
    }

    async fn repository(&self, repository_id: Uuid) -> AccessResult<RepositoryRecord> {
        let found = repository::Entity::find_by_id(repository_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AccessError::not_found("Repository", repository_id))?;

        let mut shares = self.shares_by_repository(vec![repository_id]).await?;
        Ok(RepositoryRecord::from_model(
            found,
            shares.remove(&repository_id).unwrap_or_default(),
        ))
    }

    async fn repository_candidates(
        &self,
        team_ids: &[Uuid],
    ) -> AccessResult<Vec<RepositoryRecord>> {
        let linked: Vec<Uuid> = if team_ids.is_empty() {
            Vec::new()
        } else {
            team_repository::Entity::find()
                .filter(team_repository::Column::TeamId.is_in(team_ids.iter().copied()))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|link| link.repository_id)
                .collect()
        };

        let mut reach = Condition::any().add(
            repository::Column::PermissionLevel
                .is_in([PermissionLevel::SharedRead, PermissionLevel::SharedWrite]),
        );
        if !team_ids.is_empty() {
            reach = reach.add(repository::Column::TeamId.is_in(team_ids.iter().copied()));
        }
        if !linked.is_empty() {
            reach = reach.add(repository::Column::Id.is_in(linked));
        }

        let repositories = repository::Entity::find()
            .filter(reach)
            .order_by_asc(repository::Column::Id)
            .all(&self.db)
            .await?;

        let mut shares = self
            .shares_by_repository(repositories.iter().map(|r| r.id).collect())
            .await?;

        Ok(repositories
            .into_iter()
            .map(|r| {
                let links = shares.remove(&r.id).unwrap_or_default();
                RepositoryRecord::from_model(r, links)
            })
            .collect())
    }

    async fn rows_for_repositories(&self, query: &RowQuery) -> AccessResult<Vec<RowRecord>> {
        let repository_ids = &query.repository_ids;
        if repository_ids.is_empty() {
            return Ok(Vec::new());
        }

        let kinds: HashMap<Uuid, repository_column::ColumnKind> =
            repository_column::Entity::find()
                .filter(
                    repository_column::Column::RepositoryId
                        .is_in(repository_ids.iter().copied()),
                )
                .all(&self.db)
                .await?
                .into_iter()
                .map(|c| (c.id, c.kind))
                .collect();

        let mut select = repository_row::Entity::find()
            .filter(repository_row::Column::RepositoryId.is_in(repository_ids.iter().copied()));
        if let Some(text) = &query.text {
            select = select.filter(self.row_text_condition(text, &kinds).await?);
        }

        let rows = select
            .order_by_asc(repository_row::Column::Id)
            .all(&self.db)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut creator_ids: Vec<Uuid> = rows.iter().map(|r| r.created_by).collect();
        creator_ids.sort_unstable();
        creator_ids.dedup();
        let creators: HashMap<Uuid, Option<String>> = user::Entity::find()
            .filter(user::Column::Id.is_in(creator_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.full_name))
            .collect();

        let mut cells: HashMap<i32, Vec<CellRecord>> = HashMap::new();
        let cell_models = repository_cell::Entity::find()
            .filter(repository_cell::Column::RowId.is_in(rows.iter().map(|r| r.id)))
            .all(&self.db)
            .await?;
        for cell in cell_models {
            if let Some(kind) = kinds.get(&cell.column_id) {
                cells.entry(cell.row_id).or_default().push(CellRecord {
                    column_id: cell.column_id,
                    kind: *kind,
                    value: cell.value,
                });
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let creator_name = creators.get(&row.created_by).cloned().flatten();
                let row_cells = cells.remove(&row.id).unwrap_or_default();
                RowRecord::from_model(row, creator_name, row_cells)
            })
            .collect())
    }
}
