//! HTTP middleware.

mod auth;

pub use auth::{auth_middleware, require_admin, require_editor, verify_token, CurrentUser};
