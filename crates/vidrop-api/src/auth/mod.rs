//! Bearer token authentication: JWT verification middleware and the
//! request-scoped identity handlers extract from it.

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::JwtService;
pub use models::{JwtClaims, UserIdentity};
