// handlers/public/home.rs - GET /, GET /health and GET /api/public/home

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::listing::project;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{news, projects, PublicNews, PublicProject};
use crate::services::EntityKind;
use crate::table::SortDirection;

/// Items per home-page section when `limit` is not given.
pub const HOME_FEED_LIMIT: usize = 3;

pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "Campus CMS",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Community platform backend for a technical school",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "feed": "/api/public/home[?limit=n] (public)",
            "people": "/api/public/people[/:id] (public)",
            "projects": "/api/public/projects[/:id] (public)",
            "news": "/api/public/news[/:id] (public)",
            "session": "/api/auth/session (optional bearer token)",
            "admin": "/api/admin/:kind[/:id[/restore]] (admin role)"
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.services.backend_name();

    match state.services.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "storage": backend }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": { "message": "Storage unavailable", "code": "SERVICE_UNAVAILABLE" },
                    "data": { "status": "degraded", "timestamp": now, "storage": backend }
                })),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub limit: Option<String>,
}

/// Latest published news and most recently added published projects.
#[derive(Debug, Serialize)]
pub struct HomeFeed {
    pub latest_news: Vec<PublicNews>,
    pub recent_projects: Vec<PublicProject>,
}

pub async fn home_feed(State(state): State<AppState>, Query(query): Query<HomeQuery>) -> ApiResult<HomeFeed> {
    let limit = match query.limit.as_deref() {
        None => HOME_FEED_LIMIT,
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ApiError::bad_request(format!("Invalid limit '{}'", raw)))?,
    };

    let news_rows = state
        .services
        .entity(EntityKind::News)
        .get_all(&news::public_options().limit(limit))
        .await?;
    let project_rows = state
        .services
        .entity(EntityKind::Projects)
        .get_all(
            &projects::public_options()
                .order_by("created_at", SortDirection::Desc)
                .limit(limit),
        )
        .await?;

    let feed = HomeFeed {
        latest_news: news_rows.into_iter().map(project).collect::<Result<Vec<PublicNews>, ApiError>>()?,
        recent_projects: project_rows
            .into_iter()
            .map(project)
            .collect::<Result<Vec<PublicProject>, ApiError>>()?,
    };
    tracing::debug!(news = feed.latest_news.len(), projects = feed.recent_projects.len(), "Home feed");
    Ok(ApiResponse::success(feed))
}
