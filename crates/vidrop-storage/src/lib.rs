//! Vidrop Storage Library
//!
//! This crate provides the object storage abstraction for Vidrop. It includes
//! the Storage trait and implementations for S3 and the local filesystem,
//! plus presigned URL issuance for direct client uploads and downloads.
//!
//! # Storage key format
//!
//! Storage keys are user-scoped. All backends use the same key layout for
//! consistency:
//!
//! - **Direct uploads**: `users/{user_id}/uploads/{timestamp_ms}_{filename}`
//! - **Other objects**: `users/{user_id}/{path}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized
//! in the `keys` module so all backends and the CDN signer stay consistent.

pub mod factory;
pub mod keys;
pub mod local;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use local::LocalStorage;
pub use s3::S3Storage;
pub use traits::{ObjectSummary, Storage, StorageError, StorageResult};
pub use vidrop_core::StorageBackend;
