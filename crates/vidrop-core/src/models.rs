//! Domain models shared across the workspace.
//!
//! Wire format is camelCase (`filePath`, `createdAt`) to match the public API
//! contract; database columns stay snake_case via `FromRow`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User entity from the upstream identity provider
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted video metadata row.
///
/// `file_path` is the storage key's unique filename with its extension
/// stripped at finalization time; the row is created only after the client
/// reports a successful direct upload and is never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: Uuid,
    pub file_path: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
