//! Centralized default constants for the archives service.
//!
//! Every crate references these instead of defining its own magic numbers.

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 5000;

/// Default database URL when `DATABASE_URL` is not set.
pub const DATABASE_URL: &str = "postgres://localhost/archives";

/// Maximum request body size in bytes (1 MiB).
pub const MAX_BODY_SIZE_BYTES: usize = 1024 * 1024;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Default allowed CORS origin (the frontend dev server).
pub const ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

// =============================================================================
// DATABASE POOL
// =============================================================================

/// Maximum number of pooled connections.
pub const DB_MAX_CONNECTIONS: u32 = 10;

/// Connection acquire timeout in seconds.
pub const DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Idle connection timeout in seconds.
pub const DB_IDLE_TIMEOUT_SECS: u64 = 600;

// =============================================================================
// ANALYTICS
// =============================================================================

/// Number of entries shown in "top categories" / "top years".
pub const TOP_CATEGORIES: usize = 5;

/// Currency symbol used when rendering amounts.
pub const CURRENCY_SYMBOL: &str = "R";

// =============================================================================
// CLIENT
// =============================================================================

/// Default base URL of the archives API.
pub const API_URL: &str = "http://localhost:5000";

/// HTTP client request timeout in seconds.
pub const CLIENT_TIMEOUT_SECS: u64 = 30;
