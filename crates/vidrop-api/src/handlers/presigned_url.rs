use crate::auth::models::UserIdentity;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use vidrop_core::constants::DEFAULT_PRESIGN_TTL;
use vidrop_core::AppError;
use vidrop_storage::keys;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrlRequest {
    /// Desired file name for the upload, e.g. "ride.mp4".
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrlResponse {
    pub presigned_url: String,
    /// Unique derived name (`{timestamp_ms}_{filePath}`); the client passes it
    /// back verbatim when finalizing the record.
    pub file_name: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrlQuery {
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPresignedUrlResponse {
    pub presigned_url: String,
}

/// Issue a presigned upload URL for a new video
///
/// The storage key is `users/{userId}/uploads/{timestamp_ms}_{filePath}`;
/// prepending the millisecond timestamp keeps concurrent uploads of the same
/// file name from clobbering each other.
#[utoipa::path(
    post,
    path = "/api/video/presigned_url",
    tag = "videos",
    request_body = PresignedUrlRequest,
    responses(
        (status = 200, description = "Presigned upload URL issued", body = PresignedUrlResponse),
        (status = 400, description = "File path missing", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        user_id = %identity.user_id,
        file_path = ?request.file_path,
        operation = "create_presigned_url"
    )
)]
pub async fn create_presigned_url(
    identity: UserIdentity,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<PresignedUrlRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let file_path = match request.file_path.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => {
            return Err(HttpAppError(AppError::BadRequest(
                "File path is required".to_string(),
            )))
        }
    };

    let user = state
        .db
        .user_repository
        .find_by_id(identity.user_id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let file_name = keys::unique_upload_filename(Utc::now().timestamp_millis(), file_path);
    let key = keys::upload_object_key(user.id, &file_name);

    let presigned_url = state
        .media
        .storage
        .presigned_put_url(&key, DEFAULT_PRESIGN_TTL)
        .await
        .map_err(HttpAppError::from)?;

    tracing::info!(
        user_id = %user.id,
        file_name = %file_name,
        ttl_secs = DEFAULT_PRESIGN_TTL.as_secs(),
        "Issued presigned upload URL"
    );

    Ok(Json(PresignedUrlResponse {
        presigned_url,
        file_name,
    }))
}

/// Issue a presigned upload URL for an exact key (legacy variant)
///
/// Unlike the POST variant, the key is `users/{userId}/{filePath}` with no
/// timestamp uniquification, so re-uploading the same path overwrites the
/// object.
#[utoipa::path(
    get,
    path = "/api/video/presigned_url",
    tag = "videos",
    params(PresignedUrlQuery),
    responses(
        (status = 200, description = "Presigned upload URL issued", body = LegacyPresignedUrlResponse),
        (status = 400, description = "File path missing", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state, query),
    fields(
        user_id = %identity.user_id,
        file_path = ?query.file_path,
        operation = "legacy_presigned_url"
    )
)]
pub async fn legacy_presigned_url(
    identity: UserIdentity,
    Query(query): Query<PresignedUrlQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let file_path = match query.file_path.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => {
            return Err(HttpAppError(AppError::BadRequest(
                "File path is required".to_string(),
            )))
        }
    };

    let user = state
        .db
        .user_repository
        .find_by_id(identity.user_id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let key = keys::user_object_key(user.id, file_path);

    let presigned_url = state
        .media
        .storage
        .presigned_put_url(&key, DEFAULT_PRESIGN_TTL)
        .await
        .map_err(HttpAppError::from)?;

    tracing::info!(user_id = %user.id, key = %key, "Issued legacy presigned upload URL");

    Ok(Json(LegacyPresignedUrlResponse { presigned_url }))
}
