use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{get_session, Session};
use crate::error::ApiError;

/// Decodes the bearer token, if any, and stores `Option<Session>` on the request.
///
/// A missing or invalid token is not an error here; routes that need a user
/// sit behind [`require_admin`].
pub async fn session_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let session = get_session(request.headers(), &state.security.jwt_secret);
    if let Some(session) = &session {
        tracing::debug!(user_id = %session.user_id, role = %session.role, "Authenticated request");
    }
    request.extensions_mut().insert(session);
    next.run(request).await
}

/// 401 without a session, 403 when the session lacks the admin role.
///
/// On success the plain [`Session`] is added to the extensions for handlers.
pub async fn require_admin(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, ApiError> {
    let session = request
        .extensions()
        .get::<Option<Session>>()
        .cloned()
        .flatten()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !session.is_admin(&state.security.admin_role) {
        tracing::warn!(user_id = %session.user_id, role = %session.role, "Admin route refused");
        return Err(ApiError::forbidden("Administrator role required"));
    }

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
