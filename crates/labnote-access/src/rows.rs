//! Repository row search over already-loaded repositories and rows

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::error::AccessResult;
use crate::filter::{unique_by, FilterChain};
use crate::matcher::{MatchOptions, TextMatcher};
use crate::model::{Principal, RepositoryRecord, RowRecord};
use crate::order::{sort_by_key, SortKey};
use crate::page::{Page, PageRequest};
use crate::policy;
use labnote_db::entities::repository_row::ID_PREFIX;

/// Parameters of a repository row search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSearch {
    pub query: Option<String>,
    pub page: PageRequest,
    /// Search only this repository's rows
    pub repository: Option<Uuid>,
    pub sort: SortKey,
    pub options: MatchOptions,
}

/// Paginated rows, or per-repository match counts for unpaginated requests
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowSearchResult {
    Rows(Page<RowRecord>),
    Counts { counts: BTreeMap<Uuid, usize> },
}

/// Rows a store should load for a search: those of `repository_ids`,
/// narrowed by `text` when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowQuery {
    pub repository_ids: Vec<Uuid>,
    pub text: Option<TextFilter>,
}

impl RowQuery {
    pub fn new(repository_ids: Vec<Uuid>, matcher: &TextMatcher) -> Self {
        Self {
            repository_ids,
            text: TextFilter::for_matcher(matcher),
        }
    }
}

/// Necessary condition for a row match: the name, the id, the creator name or
/// an extra-searchable cell contains one of `terms`.
///
/// Rows failing it can never match. Rows passing it still go through
/// [`row_matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter {
    pub terms: Vec<String>,
    /// Terms are lowercase and compare against lowercased fields
    pub ignore_case: bool,
}

impl TextFilter {
    /// `None` when the store cannot narrow rows for this matcher.
    pub fn for_matcher(matcher: &TextMatcher) -> Option<Self> {
        if matcher.matches_everything() {
            return None;
        }

        let ignore_case = !matcher.options().case_sensitive;
        // Database LOWER() only folds ASCII reliably
        if ignore_case && !matcher.needles().iter().all(|n| n.is_ascii()) {
            return None;
        }

        let filter = Self {
            terms: matcher.needles().to_vec(),
            ignore_case,
        };
        // A term inside the id prefix matches every row
        if filter.terms.iter().any(|t| filter.id_patterns(t).is_none()) {
            return None;
        }
        Some(filter)
    }

    /// LIKE patterns over the decimal row id covering every way `term` can
    /// occur in the numeric or the prefixed id. `None` when `term` lies
    /// inside the prefix itself.
    pub fn id_patterns(&self, term: &str) -> Option<Vec<String>> {
        let prefix = if self.ignore_case {
            ID_PREFIX.to_lowercase()
        } else {
            ID_PREFIX.to_string()
        };
        if prefix.contains(term) {
            return None;
        }

        let mut patterns = Vec::new();
        if is_digits(term) {
            patterns.push(format!("%{}%", term));
        }
        for start in 0..prefix.len() {
            if let Some(rest) = term.strip_prefix(&prefix[start..]) {
                if is_digits(rest) {
                    patterns.push(format!("{}%", rest));
                }
            }
        }
        Some(patterns)
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Repositories at least one of the principal's teams may see.
pub fn accessible_repositories(
    principal: &Principal,
    candidates: Vec<RepositoryRecord>,
) -> Vec<RepositoryRecord> {
    let team_ids = principal.team_ids();
    let chain = FilterChain::new().then("team_access", |r: &RepositoryRecord| {
        policy::repository_visible_to_any(&team_ids, r)
    });

    unique_by(chain.apply(candidates), |r| r.id)
}

/// Name, numeric id or creator name; otherwise any extra-searchable cell.
pub fn row_matches(row: &RowRecord, matcher: &TextMatcher) -> bool {
    if matcher.matches_everything() {
        return true;
    }

    let direct = matcher.is_match(&row.name)
        || matcher.is_match(&row.id.to_string())
        || matcher.is_match(&row.prefixed_id())
        || row
            .creator_name
            .as_deref()
            .is_some_and(|name| matcher.is_match(name));

    direct
        || row
            .cells
            .iter()
            .any(|cell| cell.kind.is_extra_searchable() && matcher.is_match(&cell.value))
}

/// Match `rows` belonging to `repository_ids`, then count or paginate them.
pub fn search_rows_in(
    repository_ids: &HashSet<Uuid>,
    rows: Vec<RowRecord>,
    params: &RowSearch,
    config: &SearchConfig,
) -> AccessResult<RowSearchResult> {
    let matcher = TextMatcher::new(params.query.as_deref(), params.options, config)?;

    let chain = FilterChain::new()
        .then("repository_scope", |r: &RowRecord| {
            repository_ids.contains(&r.repository_id)
        })
        .then_if(!matcher.matches_everything(), "row_match", |r: &RowRecord| {
            row_matches(r, &matcher)
        });

    let mut found = unique_by(chain.apply(rows), |r| r.id);
    debug!(
        repositories = repository_ids.len(),
        matches = found.len(),
        "row search evaluated"
    );

    match params.page {
        PageRequest::All => {
            let mut counts = BTreeMap::new();
            for row in &found {
                *counts.entry(row.repository_id).or_insert(0) += 1;
            }
            Ok(RowSearchResult::Counts { counts })
        }
        request @ PageRequest::Number(_) => {
            sort_by_key(&mut found, params.sort);
            Ok(RowSearchResult::Rows(Page::paginate(
                found,
                request,
                config.search_limit,
            )))
        }
    }
}
