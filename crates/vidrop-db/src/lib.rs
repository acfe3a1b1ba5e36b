//! Database repositories for the data access layer
//!
//! Each repository wraps a `PgPool` and is responsible for one entity. All
//! queries are dynamic (no compile-time schema verification) so builds do not
//! require a live DATABASE_URL.

pub mod users;
pub mod videos;

pub use users::UserRepository;
pub use videos::VideoRepository;
