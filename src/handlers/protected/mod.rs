// handlers/protected/mod.rs - Session-aware handlers
//
// These routes read the optional session that `session_middleware` stored on
// the request. They never reject anonymous callers.

pub mod session;

pub use session::session_get;
