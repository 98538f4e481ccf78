// handlers/protected/session.rs - GET /api/auth/session handler

use axum::{extract::State, Extension};
use serde::Serialize;

use crate::app::AppState;
use crate::auth::Session;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub is_admin: bool,
}

/// Current session, or `null` for anonymous callers.
pub async fn session_get(
    State(state): State<AppState>,
    Extension(session): Extension<Option<Session>>,
) -> ApiResult<Option<SessionView>> {
    let view = session.map(|session| SessionView {
        is_admin: session.is_admin(&state.security.admin_role),
        session,
    });
    Ok(ApiResponse::success(view))
}
