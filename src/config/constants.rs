//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 200;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

// =============================================================================
// Authentication & Security
// =============================================================================

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

// =============================================================================
// User Roles
// =============================================================================

/// Default role for authenticated users without elevated access
pub const ROLE_VIEWER: &str = "viewer";

/// Role allowed to create, update, and delete game data
pub const ROLE_EDITOR: &str = "editor";

/// Administrator role with user-management privileges
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_VIEWER, ROLE_EDITOR, ROLE_ADMIN];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// =============================================================================
// Data API (PostgREST)
// =============================================================================

/// Path prefix of the hosted REST interface, relative to the project URL
pub const REST_PATH: &str = "/rest/v1";

/// Path prefix of the auth provider's admin API
pub const AUTH_ADMIN_PATH: &str = "/auth/v1/admin";

/// Outbound request timeout in seconds
pub const DATA_API_TIMEOUT_SECONDS: u64 = 30;

// =============================================================================
// Bulk Operations
// =============================================================================

/// Default number of items processed per batch in bulk operations
pub const DEFAULT_BULK_BATCH_SIZE: usize = 100;

// =============================================================================
// Validation
// =============================================================================

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: u64 = 1;

/// Maximum slug length accepted for natural keys
pub const MAX_SLUG_LENGTH: u64 = 80;
