//! Project search over an already-loaded candidate set

use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::error::AccessResult;
use crate::filter::{unique_by, FilterChain};
use crate::matcher::{MatchOptions, TextMatcher};
use crate::model::{Principal, ProjectRecord};
use crate::order::{sort_by_key, SortKey};
use crate::page::{Page, PageRequest};
use crate::policy;

/// Parameters of a project search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectSearch {
    pub query: Option<String>,
    pub include_archived: bool,
    pub page: PageRequest,
    /// Restrict to one team instead of every team of the user
    pub current_team: Option<Uuid>,
    pub sort: SortKey,
    pub options: MatchOptions,
}

/// Teams whose projects are candidates for `principal`.
///
/// A current team the user does not belong to yields no candidates.
pub fn team_scope(principal: &Principal, current_team: Option<Uuid>) -> Vec<Uuid> {
    match current_team {
        Some(team_id) if principal.is_member_of(team_id) => vec![team_id],
        Some(_) => Vec::new(),
        None => principal.team_ids(),
    }
}

/// Filter, order and paginate `candidates` for `principal`.
pub fn search_projects_in(
    principal: &Principal,
    candidates: Vec<ProjectRecord>,
    params: &ProjectSearch,
    config: &SearchConfig,
) -> AccessResult<Page<ProjectRecord>> {
    let matcher = TextMatcher::new(params.query.as_deref(), params.options, config)?;
    let scope: HashSet<Uuid> = team_scope(principal, params.current_team)
        .into_iter()
        .collect();

    let chain = FilterChain::new()
        .then("team_scope", |p: &ProjectRecord| scope.contains(&p.team_id))
        .then("visibility", |p: &ProjectRecord| {
            policy::project_visible(principal, p)
        })
        .then_if(
            !matcher.matches_everything(),
            "name_match",
            |p: &ProjectRecord| matcher.is_match(&p.name),
        )
        .then_if(!params.include_archived, "active_only", |p: &ProjectRecord| {
            !p.archived
        });

    let mut found = unique_by(chain.apply(candidates), |p| p.id);
    sort_by_key(&mut found, params.sort);

    debug!(
        user_id = %principal.user_id,
        matches = found.len(),
        sort = %params.sort,
        "project search evaluated"
    );

    Ok(Page::paginate(found, params.page, config.search_limit))
}
