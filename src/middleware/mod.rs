pub mod auth;
pub mod response;

pub use auth::{require_admin, session_middleware};
pub use response::{ApiResponse, ApiResult};
