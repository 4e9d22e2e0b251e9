//! Scoped search engine: loads fresh candidates from a [`SearchStore`] and
//! runs the pure search functions over them.

use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::error::AccessResult;
use crate::matcher::TextMatcher;
use crate::model::{Principal, ProjectRecord};
use crate::page::Page;
use crate::policy::{self, RepositoryAccess};
use crate::projects::{self, ProjectSearch};
use crate::rows::{self, RowQuery, RowSearch, RowSearchResult};
use crate::store::SearchStore;

pub struct SearchEngine<S> {
    store: S,
    config: SearchConfig,
}

impl<S: SearchStore> SearchEngine<S> {
    pub fn new(store: S, config: SearchConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub async fn principal(&self, user_id: Uuid) -> AccessResult<Principal> {
        self.store.principal(user_id).await
    }

    /// Projects `user_id` may see, filtered by name, ordered and paginated.
    pub async fn search_projects(
        &self,
        user_id: Uuid,
        params: &ProjectSearch,
    ) -> AccessResult<Page<ProjectRecord>> {
        let principal = self.store.principal(user_id).await?;
        if let Some(team_id) = params.current_team {
            self.store.ensure_team(team_id).await?;
        }

        let scope = projects::team_scope(&principal, params.current_team);
        debug!(
            %user_id,
            teams = scope.len(),
            include_archived = params.include_archived,
            "searching projects"
        );

        let candidates = self.store.projects_for_teams(&scope).await?;
        projects::search_projects_in(&principal, candidates, params, &self.config)
    }

    /// Rows of repositories reachable by any of the user's teams.
    pub async fn search_repository_rows(
        &self,
        user_id: Uuid,
        params: &RowSearch,
    ) -> AccessResult<RowSearchResult> {
        let principal = self.store.principal(user_id).await?;
        let matcher = TextMatcher::new(params.query.as_deref(), params.options, &self.config)?;

        let candidates = match params.repository {
            Some(repository_id) => vec![self.store.repository(repository_id).await?],
            None => {
                self.store
                    .repository_candidates(&principal.team_ids())
                    .await?
            }
        };

        let accessible = rows::accessible_repositories(&principal, candidates);
        let repository_ids: Vec<Uuid> = accessible.iter().map(|r| r.id).collect();
        debug!(
            %user_id,
            repositories = repository_ids.len(),
            "searching repository rows"
        );

        let query = RowQuery::new(repository_ids, &matcher);
        let found = self.store.rows_for_repositories(&query).await?;
        let scope: HashSet<Uuid> = query.repository_ids.into_iter().collect();
        rows::search_rows_in(&scope, found, params, &self.config)
    }

    /// Whether `user_id` may see the project. Non-members of its team never can.
    pub async fn can_view_project(&self, user_id: Uuid, project_id: Uuid) -> AccessResult<bool> {
        let (principal, project) = self.load_project_for(user_id, project_id).await?;
        Ok(principal.is_member_of(project.team_id) && policy::project_visible(&principal, &project))
    }

    /// Whether `user_id` may manage the project. Gated on team membership
    /// like [`Self::can_view_project`], so stale project links grant nothing.
    pub async fn can_manage_project(&self, user_id: Uuid, project_id: Uuid) -> AccessResult<bool> {
        let (principal, project) = self.load_project_for(user_id, project_id).await?;
        Ok(principal.is_member_of(project.team_id)
            && policy::project_manageable(&principal, &project))
    }

    /// Repository predicates evaluated for `team_id`, on behalf of `user_id`.
    ///
    /// A user outside `team_id` gets [`RepositoryAccess::NONE`].
    pub async fn repository_access(
        &self,
        user_id: Uuid,
        team_id: Uuid,
        repository_id: Uuid,
    ) -> AccessResult<RepositoryAccess> {
        let principal = self.store.principal(user_id).await?;
        self.store.ensure_team(team_id).await?;
        let repository = self.store.repository(repository_id).await?;

        if !principal.is_member_of(team_id) {
            return Ok(RepositoryAccess::NONE);
        }

        Ok(policy::repository_access(team_id, &repository))
    }

    async fn load_project_for(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> AccessResult<(Principal, ProjectRecord)> {
        let principal = self.store.principal(user_id).await?;
        let project = self.store.project(project_id).await?;
        Ok((principal, project))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessError;
    use crate::matcher::MatchOptions;
    use crate::model::{Membership, ProjectMember, RepositoryRecord, RepositoryShare, RowRecord};
    use crate::rows::TextFilter;
    use crate::page::PageRequest;
    use crate::store::MockSearchStore;
    use chrono::Utc;
    use labnote_db::entities::{
        project::Visibility, repository::PermissionLevel, team_member::TeamRole,
        user_project::ProjectRole,
    };

    fn member_of(user_id: Uuid, team_id: Uuid, role: TeamRole) -> Principal {
        Principal::new(user_id, vec![Membership { team_id, role }])
    }

    fn project(team_id: Uuid, name: &str, visibility: Visibility) -> ProjectRecord {
        ProjectRecord {
            id: Uuid::new_v4(),
            team_id,
            name: name.to_string(),
            visibility,
            archived: false,
            archived_on: None,
            created_at: Utc::now(),
            members: vec![],
        }
    }

    fn repository(team_id: Uuid, shares: Vec<RepositoryShare>) -> RepositoryRecord {
        RepositoryRecord {
            id: Uuid::new_v4(),
            team_id,
            name: "Inventory".to_string(),
            permission_level: PermissionLevel::Private,
            archived: false,
            created_at: Utc::now(),
            shares,
        }
    }

    #[tokio::test]
    async fn test_missing_user_propagates_not_found() {
        let mut store = MockSearchStore::new();
        store
            .expect_principal()
            .returning(|id| Err(AccessError::not_found("User", id)));

        let engine = SearchEngine::new(store, SearchConfig::default());
        let result = engine
            .search_projects(Uuid::new_v4(), &ProjectSearch::default())
            .await;

        assert!(matches!(
            result,
            Err(AccessError::NotFound { entity: "User", .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_current_team_propagates_not_found() {
        let user_id = Uuid::new_v4();
        let mut store = MockSearchStore::new();
        store
            .expect_principal()
            .returning(move |_| Ok(member_of(user_id, Uuid::new_v4(), TeamRole::Member)));
        store
            .expect_ensure_team()
            .returning(|id| Err(AccessError::not_found("Team", id)));
        store.expect_projects_for_teams().never();

        let engine = SearchEngine::new(store, SearchConfig::default());
        let params = ProjectSearch {
            current_team: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let result = engine.search_projects(user_id, &params).await;

        assert!(matches!(
            result,
            Err(AccessError::NotFound { entity: "Team", .. })
        ));
    }

    #[tokio::test]
    async fn test_memberships_are_reread_on_every_search() {
        let user_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();
        let hidden = project(team_id, "Hidden", Visibility::Hidden);

        let mut store = MockSearchStore::new();
        let mut calls = 0;
        store.expect_principal().times(2).returning(move |_| {
            calls += 1;
            // Promoted to owner between the two searches
            let role = if calls == 1 {
                TeamRole::Member
            } else {
                TeamRole::Owner
            };
            Ok(member_of(user_id, team_id, role))
        });
        store
            .expect_projects_for_teams()
            .withf(move |teams| teams.to_vec() == vec![team_id])
            .times(2)
            .returning(move |_| Ok(vec![hidden.clone()]));

        let engine = SearchEngine::new(store, SearchConfig::default());
        let params = ProjectSearch::default();

        let before = engine.search_projects(user_id, &params).await.unwrap();
        assert!(before.is_empty());

        let after = engine.search_projects(user_id, &params).await.unwrap();
        assert_eq!(after.total, 1);
    }

    #[tokio::test]
    async fn test_single_repository_search_skips_candidate_scan() {
        let user_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();
        let repo = repository(team_id, vec![]);
        let repo_id = repo.id;

        let mut store = MockSearchStore::new();
        store
            .expect_principal()
            .returning(move |_| Ok(member_of(user_id, team_id, TeamRole::Member)));
        store
            .expect_repository()
            .returning(move |_| Ok(repo.clone()));
        store.expect_repository_candidates().never();
        store
            .expect_rows_for_repositories()
            .withf(move |query| {
                query.repository_ids == vec![repo_id]
                    && query.text
                        == Some(TextFilter {
                            terms: vec!["tips".to_string()],
                            ignore_case: true,
                        })
            })
            .returning(move |_| {
                Ok(vec![RowRecord {
                    id: 7,
                    repository_id: repo_id,
                    name: "Pipette tips".to_string(),
                    created_by: user_id,
                    creator_name: None,
                    archived: false,
                    archived_on: None,
                    created_at: Utc::now(),
                    cells: vec![],
                }])
            });

        let engine = SearchEngine::new(store, SearchConfig::default());
        let params = RowSearch {
            query: Some("tips".to_string()),
            repository: Some(repo_id),
            page: PageRequest::first(),
            ..Default::default()
        };

        let RowSearchResult::Rows(page) =
            engine.search_repository_rows(user_id, &params).await.unwrap()
        else {
            panic!("expected rows");
        };
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, 7);
    }

    #[tokio::test]
    async fn test_inaccessible_repository_yields_empty_result() {
        let user_id = Uuid::new_v4();
        let repo = repository(Uuid::new_v4(), vec![]);
        let repo_id = repo.id;

        let mut store = MockSearchStore::new();
        store
            .expect_principal()
            .returning(move |_| Ok(member_of(user_id, Uuid::new_v4(), TeamRole::Owner)));
        store
            .expect_repository()
            .returning(move |_| Ok(repo.clone()));
        store
            .expect_rows_for_repositories()
            .withf(|query| query.repository_ids.is_empty() && query.text.is_none())
            .returning(|_| Ok(vec![]));

        let engine = SearchEngine::new(store, SearchConfig::default());
        let params = RowSearch {
            repository: Some(repo_id),
            ..Default::default()
        };

        let RowSearchResult::Rows(page) =
            engine.search_repository_rows(user_id, &params).await.unwrap()
        else {
            panic!("expected rows");
        };
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_repository_access_for_shared_team() {
        let user_id = Uuid::new_v4();
        let team_a = Uuid::new_v4();
        let team_b = Uuid::new_v4();
        let repo = repository(
            team_a,
            vec![RepositoryShare {
                team_id: team_b,
                permission_level: PermissionLevel::SharedRead,
            }],
        );
        let repo_id = repo.id;

        let mut store = MockSearchStore::new();
        store
            .expect_principal()
            .returning(move |_| Ok(member_of(user_id, team_b, TeamRole::Member)));
        store.expect_ensure_team().returning(|_| Ok(()));
        store
            .expect_repository()
            .returning(move |_| Ok(repo.clone()));

        let engine = SearchEngine::new(store, SearchConfig::default());

        let access = engine
            .repository_access(user_id, team_b, repo_id)
            .await
            .unwrap();
        assert_eq!(
            access,
            RepositoryAccess {
                visible: true,
                writable: false
            }
        );

        // Asking on behalf of a team the user is not in reveals nothing
        let outside = engine
            .repository_access(user_id, team_a, repo_id)
            .await
            .unwrap();
        assert_eq!(outside, RepositoryAccess::NONE);
    }

    #[tokio::test]
    async fn test_can_view_project_requires_team_membership() {
        let user_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();
        let visible_elsewhere = project(Uuid::new_v4(), "Elsewhere", Visibility::Visible);
        let visible_here = project(team_id, "Here", Visibility::Visible);
        let here_id = visible_here.id;

        let mut store = MockSearchStore::new();
        store
            .expect_principal()
            .returning(move |_| Ok(member_of(user_id, team_id, TeamRole::Member)));
        store.expect_project().returning(move |id| {
            if id == here_id {
                Ok(visible_here.clone())
            } else {
                Ok(visible_elsewhere.clone())
            }
        });

        let engine = SearchEngine::new(store, SearchConfig::default());
        assert!(engine.can_view_project(user_id, here_id).await.unwrap());
        assert!(!engine
            .can_view_project(user_id, Uuid::new_v4())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_project_link_without_team_membership_manages_nothing() {
        let user_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();
        let mut owned = project(team_id, "Left behind", Visibility::Visible);
        owned.members.push(ProjectMember {
            user_id,
            role: Some(ProjectRole::Owner),
        });
        let project_id = owned.id;

        let mut store = MockSearchStore::new();
        // Removed from the team, project link still in place
        store
            .expect_principal()
            .returning(move |_| Ok(Principal::new(user_id, vec![])));
        store
            .expect_project()
            .returning(move |_| Ok(owned.clone()));

        let engine = SearchEngine::new(store, SearchConfig::default());
        assert!(!engine.can_view_project(user_id, project_id).await.unwrap());
        assert!(!engine.can_manage_project(user_id, project_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_project_owner_in_team_manages() {
        let user_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();
        let mut owned = project(team_id, "Assays", Visibility::Hidden);
        owned.members.push(ProjectMember {
            user_id,
            role: Some(ProjectRole::Owner),
        });
        let project_id = owned.id;

        let mut store = MockSearchStore::new();
        store
            .expect_principal()
            .returning(move |_| Ok(member_of(user_id, team_id, TeamRole::Member)));
        store
            .expect_project()
            .returning(move |_| Ok(owned.clone()));

        let engine = SearchEngine::new(store, SearchConfig::default());
        assert!(engine.can_manage_project(user_id, project_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_row_query_fails_before_loading_rows() {
        let user_id = Uuid::new_v4();
        let mut store = MockSearchStore::new();
        store
            .expect_principal()
            .returning(move |_| Ok(member_of(user_id, Uuid::new_v4(), TeamRole::Member)));
        store.expect_repository_candidates().never();
        store.expect_rows_for_repositories().never();

        let engine = SearchEngine::new(store, SearchConfig::default());
        let params = RowSearch {
            query: Some("x".to_string()),
            ..Default::default()
        };

        let result = engine.search_repository_rows(user_id, &params).await;
        assert!(matches!(result, Err(AccessError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_case_sensitive_row_query_reaches_store_unfolded() {
        let user_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();
        let repo = repository(team_id, vec![]);

        let mut store = MockSearchStore::new();
        store
            .expect_principal()
            .returning(move |_| Ok(member_of(user_id, team_id, TeamRole::Member)));
        store
            .expect_repository_candidates()
            .returning(move |_| Ok(vec![repo.clone()]));
        store
            .expect_rows_for_repositories()
            .withf(|query| {
                query.text
                    == Some(TextFilter {
                        terms: vec!["HEPES".to_string()],
                        ignore_case: false,
                    })
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let engine = SearchEngine::new(store, SearchConfig::default());
        let params = RowSearch {
            query: Some("HEPES".to_string()),
            options: MatchOptions {
                case_sensitive: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let RowSearchResult::Rows(page) =
            engine.search_repository_rows(user_id, &params).await.unwrap()
        else {
            panic!("expected rows");
        };
        assert!(page.is_empty());
    }
}
