// handlers/elevated/admin/create.rs - POST /api/admin/:kind handler

use axum::extract::{rejection::JsonRejection, Path, State};
use axum::{Extension, Json};
use serde_json::Value;

use super::json_body;
use crate::app::AppState;
use crate::auth::Session;
use crate::handlers::parse_kind;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{self, Mode};

pub async fn admin_create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(kind): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let kind = parse_kind(&kind)?;
    let fields = models::parse_fields(kind, json_body(body)?, Mode::Create)?;

    let row = state.services.entity(kind).create(fields).await?;
    tracing::info!(kind = %kind, id = %row["id"], actor = %session.user_id, "Created");
    Ok(ApiResponse::created(row))
}
