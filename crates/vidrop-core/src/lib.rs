//! Vidrop core library
//!
//! Shared foundation for the vidrop workspace: configuration loaded from the
//! environment, the application error taxonomy, domain models, and constants
//! (storage key layout, presign TTLs, accepted upload types).

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

pub use config::{Config, StorageBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{User, VideoRecord};
