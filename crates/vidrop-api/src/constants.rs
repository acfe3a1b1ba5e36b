//! API constants.

/// Path prefix for all authenticated API routes.
pub const API_PREFIX: &str = "/api";

/// Maximum request body size. Video bytes never pass through this API,
/// so every accepted body is a small JSON document.
pub const MAX_JSON_BODY_BYTES: usize = 1024 * 1024;
