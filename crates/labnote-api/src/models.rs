use chrono::{DateTime, Utc};
use labnote_access::{
    self as access, MatchOptions, Page, ProjectRecord, RowRecord, RowSearchResult,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Whether the database answered a ping
    pub database: bool,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Team member role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    /// Team administrator, sees every project of the team
    Owner,
    /// Regular team member
    Member,
    /// Read-only guest
    Guest,
}

impl From<access::TeamRole> for TeamRole {
    fn from(role: access::TeamRole) -> Self {
        match role {
            access::TeamRole::Owner => TeamRole::Owner,
            access::TeamRole::Member => TeamRole::Member,
            access::TeamRole::Guest => TeamRole::Guest,
        }
    }
}

/// A team the caller belongs to
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Team {
    /// Team UUID
    pub id: Uuid,
    /// Team name
    pub name: String,
    /// Caller's role in the team
    pub role: TeamRole,
    /// When the caller joined the team
    pub joined_at: DateTime<Utc>,
}

/// List of teams
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamList {
    /// Teams
    pub teams: Vec<Team>,
    /// Total count
    pub total: usize,
}

/// Query parameters for project search
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectSearchQuery {
    /// Name fragment to search for
    pub query: Option<String>,
    /// Page number, or the no-limit sentinel (-1 by default) for every result
    pub page: Option<i64>,
    /// Include archived projects
    #[serde(default)]
    pub include_archived: bool,
    /// Restrict to one team; defaults to the session's current team
    pub team_id: Option<Uuid>,
    /// new, old, atoz, ztoa, archived_new, archived_old
    pub sort: Option<String>,
    /// Whole-value equality instead of substring match
    #[serde(default)]
    pub exact: bool,
    /// Respect letter case
    #[serde(default)]
    pub case_sensitive: bool,
    /// Only match at word boundaries
    #[serde(default)]
    pub whole_word: bool,
    /// Match if any whitespace-separated word matches
    #[serde(default)]
    pub any_word: bool,
}

impl ProjectSearchQuery {
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            exact: self.exact,
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
            any_word: self.any_word,
        }
    }
}

/// Project search hit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    /// "hidden" or "visible"
    pub visibility: String,
    pub archived: bool,
    pub archived_on: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ProjectRecord> for ProjectSummary {
    fn from(project: ProjectRecord) -> Self {
        Self {
            id: project.id,
            team_id: project.team_id,
            name: project.name,
            visibility: match project.visibility {
                access::Visibility::Hidden => "hidden".to_string(),
                access::Visibility::Visible => "visible".to_string(),
            },
            archived: project.archived,
            archived_on: project.archived_on,
            created_at: project.created_at,
        }
    }
}

/// Page of project search results
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectPage {
    pub projects: Vec<ProjectSummary>,
    /// Current page, absent when every result was requested
    pub page: Option<u32>,
    pub per_page: Option<usize>,
    /// Total count across all pages
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
}

impl From<Page<ProjectRecord>> for ProjectPage {
    fn from(page: Page<ProjectRecord>) -> Self {
        let page = page.map(ProjectSummary::from);
        Self {
            projects: page.items,
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            total_pages: page.total_pages,
            has_next: page.has_next,
        }
    }
}

/// Query parameters for inventory row search
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RowSearchQuery {
    /// Text to search for in names, ids, creators and searchable cells
    pub query: Option<String>,
    /// Page number, or the no-limit sentinel for per-repository counts
    pub page: Option<i64>,
    /// Restrict to one repository
    pub repository_id: Option<Uuid>,
    /// new, old, atoz, ztoa, archived_new, archived_old
    pub sort: Option<String>,
    /// Whole-value equality instead of substring match
    #[serde(default)]
    pub exact: bool,
    /// Respect letter case
    #[serde(default)]
    pub case_sensitive: bool,
    /// Only match at word boundaries
    #[serde(default)]
    pub whole_word: bool,
    /// Match if any whitespace-separated word matches
    #[serde(default)]
    pub any_word: bool,
}

impl RowSearchQuery {
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            exact: self.exact,
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
            any_word: self.any_word,
        }
    }
}

/// Inventory row search hit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RowSummary {
    pub id: i32,
    /// Display id, e.g. "IT42"
    pub code: String,
    pub repository_id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub creator_name: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl From<RowRecord> for RowSummary {
    fn from(row: RowRecord) -> Self {
        Self {
            code: row.prefixed_id(),
            id: row.id,
            repository_id: row.repository_id,
            name: row.name,
            created_by: row.created_by,
            creator_name: row.creator_name,
            archived: row.archived,
            created_at: row.created_at,
        }
    }
}

/// Number of matching rows in one repository
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RepositoryCount {
    pub repository_id: Uuid,
    pub count: usize,
}

/// Inventory row search response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RowSearchResponse {
    /// One page of matching rows
    Rows {
        rows: Vec<RowSummary>,
        page: Option<u32>,
        per_page: Option<usize>,
        total: usize,
        total_pages: usize,
        has_next: bool,
    },
    /// Match counts per repository
    Counts { counts: Vec<RepositoryCount> },
}

impl From<RowSearchResult> for RowSearchResponse {
    fn from(result: RowSearchResult) -> Self {
        match result {
            RowSearchResult::Rows(page) => {
                let page = page.map(RowSummary::from);
                RowSearchResponse::Rows {
                    rows: page.items,
                    page: page.page,
                    per_page: page.per_page,
                    total: page.total,
                    total_pages: page.total_pages,
                    has_next: page.has_next,
                }
            }
            RowSearchResult::Counts { counts } => RowSearchResponse::Counts {
                counts: counts
                    .into_iter()
                    .map(|(repository_id, count)| RepositoryCount {
                        repository_id,
                        count,
                    })
                    .collect(),
            },
        }
    }
}

/// Project visibility for the caller
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectVisibility {
    pub project_id: Uuid,
    /// Caller may see the project
    pub visible: bool,
    /// Caller may manage the project
    pub manageable: bool,
}

/// Query parameters for repository access
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RepositoryAccessQuery {
    /// Team to evaluate; defaults to the session's current team
    pub team_id: Option<Uuid>,
}

/// Repository access for a team
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RepositoryAccessResponse {
    pub repository_id: Uuid,
    pub team_id: Uuid,
    pub visible: bool,
    pub writable: bool,
}
