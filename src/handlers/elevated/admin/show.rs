// handlers/elevated/admin/show.rs - GET /api/admin/:kind/:id handler

use axum::extract::{Path, State};
use serde_json::Value;

use crate::app::AppState;
use crate::handlers::{parse_id, parse_kind};
use crate::middleware::{ApiResponse, ApiResult};

/// Deleted rows are returned too, flagged by `is_deleted`.
pub async fn admin_show(State(state): State<AppState>, Path((kind, id)): Path<(String, String)>) -> ApiResult<Value> {
    let kind = parse_kind(&kind)?;
    let id = parse_id(&id)?;
    let row = state.services.entity(kind).get_by_id(id).await?;
    Ok(ApiResponse::success(row))
}
