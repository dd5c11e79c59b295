//! Infrastructure layer - outbound API clients and repositories.

pub mod auth_admin;
pub mod postgrest;
pub mod repositories;

pub use auth_admin::{AuthAdminApi, AuthAdminClient, AuthUser, CreateAuthUser};
pub use postgrest::PostgrestClient;
pub use repositories::Repositories;
