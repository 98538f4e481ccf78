// handlers/public/news.rs - GET /api/public/news[/:id] (published only)

use axum::extract::{Path, Query, State};

use super::listing::{list_public, show_public, ListPage};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{news, PublicNews};
use crate::services::EntityKind;

pub async fn news_list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<ListPage<PublicNews>> {
    let page = list_public(&state, EntityKind::News, news::public_options(), news::public_config(), &pairs).await?;
    Ok(ApiResponse::success(page))
}

pub async fn news_show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<PublicNews> {
    let item = show_public(&state, EntityKind::News, &id, "is_published").await?;
    Ok(ApiResponse::success(item))
}
