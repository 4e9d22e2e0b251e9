pub mod handlers;
pub mod middleware;
pub mod models;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use labnote_access::{SeaOrmStore, SearchConfig, SearchEngine};
use sea_orm::DatabaseConnection;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers
pub struct AppState {
    pub engine: SearchEngine<SeaOrmStore>,
    pub db: DatabaseConnection,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Labnote API",
        version = "0.1.0",
        description = "Permission-scoped search over projects and inventories"
    ),
    paths(
        handlers::health_check,
        handlers::list_user_teams,
        handlers::search_projects,
        handlers::search_repository_rows,
        handlers::project_visibility,
        handlers::repository_access,
    ),
    components(
        schemas(
            models::HealthResponse,
            models::ErrorResponse,
            models::TeamRole,
            models::Team,
            models::TeamList,
            models::ProjectSummary,
            models::ProjectPage,
            models::RowSummary,
            models::RepositoryCount,
            models::RowSearchResponse,
            models::ProjectVisibility,
            models::RepositoryAccessResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "search", description = "Permission-scoped search endpoints"),
        (name = "access", description = "Visibility and access checks"),
        (name = "teams", description = "Team membership endpoints"),
        (name = "system", description = "System health and info endpoints")
    )
)]
pub struct ApiDoc;

/// API server configuration
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Enable CORS (for development)
    pub enable_cors: bool,
    /// Allowed CORS origins (if None, allows localhost origins)
    pub cors_origins: Option<Vec<String>>,
    /// Secret used to verify session tokens
    pub jwt_secret: String,
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig, db: DatabaseConnection, search: SearchConfig) -> Self {
        let engine = SearchEngine::new(SeaOrmStore::new(db.clone()), search);
        let state = Arc::new(AppState { engine, db });

        Self { config, state }
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let api_doc = ApiDoc::openapi();

        let jwt_state = Arc::new(middleware::JwtState::new(
            self.config.jwt_secret.as_bytes(),
        ));

        let public_router = Router::new()
            .route("/api/health", get(handlers::health_check))
            .with_state(self.state.clone());

        let protected_router = Router::new()
            .route("/api/teams", get(handlers::list_user_teams))
            .route("/api/search/projects", get(handlers::search_projects))
            .route(
                "/api/search/repository-rows",
                get(handlers::search_repository_rows),
            )
            .route(
                "/api/projects/{id}/visibility",
                get(handlers::project_visibility),
            )
            .route(
                "/api/repositories/{id}/access",
                get(handlers::repository_access),
            )
            .with_state(self.state.clone())
            .layer(axum_middleware::from_fn_with_state(
                jwt_state,
                middleware::require_auth,
            ));

        // SwaggerUi serves /api/openapi.json itself
        let router = Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", api_doc))
            .merge(public_router)
            .merge(protected_router)
            .layer(TraceLayer::new_for_http());

        match self.cors_layer() {
            Some(cors) => router.layer(cors),
            None => router,
        }
    }

    fn cors_layer(&self) -> Option<CorsLayer> {
        if !self.config.enable_cors {
            return None;
        }

        // Credentials (session cookie) rule out a wildcard origin
        let allow_origin = match &self.config.cors_origins {
            Some(origins) => AllowOrigin::list(origins.iter().filter_map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| warn!("Ignoring invalid CORS origin: {}", origin))
                    .ok()
            })),
            None => AllowOrigin::predicate(|origin: &HeaderValue, _| {
                let origin = origin.to_str().unwrap_or("");
                origin.starts_with("http://localhost:")
                    || origin.starts_with("http://127.0.0.1:")
                    || origin.starts_with("https://localhost:")
                    || origin.starts_with("https://127.0.0.1:")
            }),
        };

        Some(
            CorsLayer::new()
                .allow_methods([Method::GET])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
                .allow_credentials(true)
                .allow_origin(allow_origin),
        )
    }

    /// Start the API server
    pub async fn start(self) -> Result<(), anyhow::Error> {
        let router = self.build_router();

        info!("Starting API server on {}", self.config.bind_addr);
        info!(
            "OpenAPI spec: http://{}/api/openapi.json",
            self.config.bind_addr
        );
        info!("Swagger UI: http://{}/swagger-ui", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        axum::serve(listener, router)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        Ok(())
    }
}
