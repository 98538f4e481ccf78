// handlers/elevated/admin/update.rs - PUT /api/admin/:kind/:id handler

use axum::extract::{rejection::JsonRejection, Path, State};
use axum::{Extension, Json};
use serde_json::Value;

use super::json_body;
use crate::app::AppState;
use crate::auth::Session;
use crate::handlers::{parse_id, parse_kind};
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{self, Mode};

/// Partial update: only the sent fields are validated and written.
pub async fn admin_update(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((kind, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let kind = parse_kind(&kind)?;
    let id = parse_id(&id)?;
    let fields = models::parse_fields(kind, json_body(body)?, Mode::Update)?;

    let row = state.services.entity(kind).update(id, fields).await?;
    tracing::info!(kind = %kind, %id, actor = %session.user_id, "Updated");
    Ok(ApiResponse::success(row))
}
