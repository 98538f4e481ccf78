// handlers/public/projects.rs - GET /api/public/projects[/:id]

use axum::extract::{Path, Query, State};

use super::listing::{list_public, show_public, ListPage};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{projects, PublicProject};
use crate::services::EntityKind;

pub async fn projects_list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<ListPage<PublicProject>> {
    let page = list_public(
        &state,
        EntityKind::Projects,
        projects::public_options(),
        projects::public_config(),
        &pairs,
    )
    .await?;
    Ok(ApiResponse::success(page))
}

pub async fn projects_show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<PublicProject> {
    let project = show_public(&state, EntityKind::Projects, &id, "is_published").await?;
    Ok(ApiResponse::success(project))
}
