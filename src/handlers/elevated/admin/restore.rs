// handlers/elevated/admin/restore.rs - POST /api/admin/:kind/:id/restore handler

use axum::extract::{Path, State};
use axum::Extension;
use serde_json::Value;

use crate::app::AppState;
use crate::auth::Session;
use crate::handlers::{parse_id, parse_kind};
use crate::middleware::{ApiResponse, ApiResult};

pub async fn admin_restore(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let kind = parse_kind(&kind)?;
    let id = parse_id(&id)?;

    let row = state.services.entity(kind).restore(id).await?;
    tracing::info!(kind = %kind, %id, actor = %session.user_id, "Restored");
    Ok(ApiResponse::success(row))
}
