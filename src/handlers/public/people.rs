// handlers/public/people.rs - GET /api/public/people[/:id]

use axum::extract::{Path, Query, State};

use super::listing::{list_public, show_public, ListPage};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{people, PublicPerson};
use crate::services::EntityKind;

pub async fn people_list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<ListPage<PublicPerson>> {
    let page = list_public(&state, EntityKind::People, people::public_options(), people::public_config(), &pairs).await?;
    Ok(ApiResponse::success(page))
}

pub async fn people_show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<PublicPerson> {
    let person = show_public(&state, EntityKind::People, &id, "is_public").await?;
    Ok(ApiResponse::success(person))
}
