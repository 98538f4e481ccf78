// handlers/elevated/admin/delete.rs - DELETE /api/admin/:kind/:id handler

use axum::extract::{Path, State};
use axum::Extension;
use serde_json::Value;

use crate::app::AppState;
use crate::auth::Session;
use crate::handlers::{parse_id, parse_kind};
use crate::middleware::{ApiResponse, ApiResult};

/// Soft delete, stamped with the acting admin.
pub async fn admin_delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let kind = parse_kind(&kind)?;
    let id = parse_id(&id)?;

    let row = state.services.entity(kind).soft_delete(id, session.user_id).await?;
    tracing::info!(kind = %kind, %id, actor = %session.user_id, "Soft-deleted");
    Ok(ApiResponse::success(row))
}
