use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use labnote_access::{AccessError, PageRequest, ProjectSearch, RowSearch, SortKey};
use labnote_db::entities::{team, team_member};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::models::*;
use crate::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map core errors onto HTTP responses
pub fn access_error(err: AccessError) -> ApiError {
    match err {
        AccessError::InvalidArgument(message) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: message,
                code: Some("INVALID_ARGUMENT".to_string()),
            }),
        ),
        AccessError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("{} '{}' not found", entity, id),
                code: Some(format!("{}_NOT_FOUND", entity.to_uppercase())),
            }),
        ),
        AccessError::Database(e) => database_error(e),
    }
}

fn database_error(e: sea_orm::DbErr) -> ApiError {
    error!("Database error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Database error".to_string(),
            code: Some("DATABASE_ERROR".to_string()),
        }),
    )
}

fn page_request(state: &AppState, raw: Option<i64>) -> Result<PageRequest, ApiError> {
    match raw {
        Some(raw) => PageRequest::from_raw(raw, state.engine.config()).map_err(access_error),
        None => Ok(PageRequest::first()),
    }
}

fn sort_key(raw: Option<&str>) -> Result<SortKey, ApiError> {
    raw.map(str::parse::<SortKey>)
        .transpose()
        .map(Option::unwrap_or_default)
        .map_err(access_error)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = state.db.ping().await.is_ok();

    Json(HealthResponse {
        status: if database { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}

/// List the caller's teams
#[utoipa::path(
    get,
    path = "/api/teams",
    responses(
        (status = 200, description = "Teams the caller belongs to", body = TeamList),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "teams"
)]
pub async fn list_user_teams(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<TeamList>, ApiError> {
    debug!("Listing teams for user {}", auth.user_id);

    // Unknown users (stale tokens) get a 404 rather than an empty list
    state
        .engine
        .principal(auth.user_id)
        .await
        .map_err(access_error)?;

    let memberships = team_member::Entity::find()
        .filter(team_member::Column::UserId.eq(auth.user_id))
        .order_by_asc(team_member::Column::JoinedAt)
        .find_also_related(team::Entity)
        .all(&state.db)
        .await
        .map_err(database_error)?;

    let teams: Vec<Team> = memberships
        .into_iter()
        .filter_map(|(membership, team)| {
            team.map(|team| Team {
                id: team.id,
                name: team.name,
                role: membership.role.into(),
                joined_at: membership.joined_at,
            })
        })
        .collect();
    let total = teams.len();

    Ok(Json(TeamList { teams, total }))
}

/// Search projects visible to the caller
#[utoipa::path(
    get,
    path = "/api/search/projects",
    params(ProjectSearchQuery),
    responses(
        (status = 200, description = "Page of matching projects", body = ProjectPage),
        (status = 400, description = "Invalid page, query or sort key", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User or team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "search"
)]
pub async fn search_projects(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ProjectSearchQuery>,
) -> Result<Json<ProjectPage>, ApiError> {
    debug!("Project search: {:?}", query);

    let params = ProjectSearch {
        query: query.query.clone(),
        include_archived: query.include_archived,
        page: page_request(&state, query.page)?,
        current_team: query.team_id.or(auth.current_team),
        sort: sort_key(query.sort.as_deref())?,
        options: query.match_options(),
    };

    let page = state
        .engine
        .search_projects(auth.user_id, &params)
        .await
        .map_err(access_error)?;

    Ok(Json(page.into()))
}

/// Search inventory rows across repositories reachable by the caller's teams
#[utoipa::path(
    get,
    path = "/api/search/repository-rows",
    params(RowSearchQuery),
    responses(
        (status = 200, description = "Page of rows, or per-repository counts when page is the no-limit sentinel", body = RowSearchResponse),
        (status = 400, description = "Invalid page, query or sort key", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User or repository not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "search"
)]
pub async fn search_repository_rows(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<RowSearchQuery>,
) -> Result<Json<RowSearchResponse>, ApiError> {
    debug!("Repository row search: {:?}", query);

    let params = RowSearch {
        query: query.query.clone(),
        page: page_request(&state, query.page)?,
        repository: query.repository_id,
        sort: sort_key(query.sort.as_deref())?,
        options: query.match_options(),
    };

    let result = state
        .engine
        .search_repository_rows(auth.user_id, &params)
        .await
        .map_err(access_error)?;

    Ok(Json(result.into()))
}

/// Whether the caller may see and manage a project
#[utoipa::path(
    get,
    path = "/api/projects/{id}/visibility",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Visibility of the project for the caller", body = ProjectVisibility),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User or project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "access"
)]
pub async fn project_visibility(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectVisibility>, ApiError> {
    let visible = state
        .engine
        .can_view_project(auth.user_id, id)
        .await
        .map_err(access_error)?;
    let manageable = state
        .engine
        .can_manage_project(auth.user_id, id)
        .await
        .map_err(access_error)?;

    Ok(Json(ProjectVisibility {
        project_id: id,
        visible,
        manageable,
    }))
}

/// Visibility and write access of a repository for one of the caller's teams
#[utoipa::path(
    get,
    path = "/api/repositories/{id}/access",
    params(
        ("id" = Uuid, Path, description = "Repository ID"),
        RepositoryAccessQuery
    ),
    responses(
        (status = 200, description = "Repository access for the team", body = RepositoryAccessResponse),
        (status = 400, description = "No team given and no current team in the session", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User, team or repository not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "access"
)]
pub async fn repository_access(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<RepositoryAccessQuery>,
) -> Result<Json<RepositoryAccessResponse>, ApiError> {
    let team_id = query.team_id.or(auth.current_team).ok_or_else(|| {
        access_error(AccessError::invalid(
            "team_id is required when the session has no current team",
        ))
    })?;

    let access = state
        .engine
        .repository_access(auth.user_id, team_id, id)
        .await
        .map_err(access_error)?;

    Ok(Json(RepositoryAccessResponse {
        repository_id: id,
        team_id,
        visible: access.visible,
        writable: access.writable,
    }))
}
