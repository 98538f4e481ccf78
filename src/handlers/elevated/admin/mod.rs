// handlers/elevated/admin/mod.rs - Content management for every entity kind
//
// One set of handlers serves people, projects, topics, news and
// organizations; `:kind` picks the service, input model and list view.

pub mod create;
pub mod delete;
pub mod list;
pub mod restore;
pub mod show;
pub mod update;

pub use create::admin_create; // POST   /api/admin/:kind
pub use delete::admin_delete; // DELETE /api/admin/:kind/:id
pub use list::admin_list; // GET    /api/admin/:kind
pub use restore::admin_restore; // POST   /api/admin/:kind/:id/restore
pub use show::admin_show; // GET    /api/admin/:kind/:id
pub use update::admin_update; // PUT    /api/admin/:kind/:id

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;

/// Request body as JSON, with axum's rejection folded into the API envelope.
pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::invalid_json(rejection.body_text())),
    }
}
