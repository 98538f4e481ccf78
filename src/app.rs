// app.rs - Router assembly and server startup

use anyhow::Context;
use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig, StorageBackend, TableDefaults};
use crate::database::DatabaseManager;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{require_admin, session_middleware};
use crate::services::Services;

/// Everything handlers need, passed explicitly through axum state.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub security: SecurityConfig,
    pub table: TableDefaults,
}

impl AppState {
    pub fn new(services: Services, config: &AppConfig) -> Self {
        Self {
            services,
            security: config.security.clone(),
            table: config.table.clone(),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.security);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(public_routes())
        // Session-aware
        .route("/api/auth/session", get(protected::session_get))
        // Admin role required
        .merge(admin_routes(state.clone()))
        // Global middleware
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/public/home", get(public::home_feed))
        .route("/api/public/people", get(public::people_list))
        .route("/api/public/people/:id", get(public::people_show))
        .route("/api/public/projects", get(public::projects_list))
        .route("/api/public/projects/:id", get(public::projects_show))
        .route("/api/public/news", get(public::news_list))
        .route("/api/public/news/:id", get(public::news_show))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/:kind", get(elevated::admin_list).post(elevated::admin_create))
        .route(
            "/api/admin/:kind/:id",
            get(elevated::admin_show)
                .put(elevated::admin_update)
                .delete(elevated::admin_delete),
        )
        .route("/api/admin/:kind/:id/restore", post(elevated::admin_restore))
        .route_layer(from_fn_with_state(state, require_admin))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Services for the configured storage backend.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<Services> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; content is lost on restart");
            Ok(Services::memory())
        }
        StorageBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to Postgres")?;
            Ok(Services::postgres(pool))
        }
    }
}

pub async fn serve(config: &AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECURITY_JWT_SECRET must be set outside development");
    }
    if crate::is_development!() {
        tracing::warn!("Running in development mode; do not expose this server");
    }

    let services = build_services(config).await?;
    let app = app(AppState::new(services, config));

    let bind_addr = format!("0.0.0.0:{}", port.unwrap_or(config.api.port));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Campus CMS listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
