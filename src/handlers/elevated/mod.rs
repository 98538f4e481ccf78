// handlers/elevated/mod.rs - Admin panel handlers (admin role required)
//
// Route Prefix: /api/admin/:kind
// Middleware: session_middleware on the whole app, require_admin on these routes

pub mod admin;

pub use admin::*;
