use crate::auth::models::UserIdentity;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use utoipa::ToSchema;
use vidrop_core::models::VideoRecord;
use vidrop_core::AppError;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    /// The `fileName` returned by the credential endpoint, e.g.
    /// "1700000000000_ride.mp4".
    pub file_path: String,
}

/// Strip directories and the final extension, mirroring `Path::file_stem`:
/// "clip.mp4" -> "clip", "archive.tar.gz" -> "archive.tar", ".env" -> ".env".
fn record_name(file_path: &str) -> &str {
    Path::new(file_path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_path)
}

/// Finalize an upload by creating the video record
///
/// Trusts that the client's direct-to-storage PUT already succeeded; object
/// existence is not verified. The record stores the supplied name with its
/// extension stripped. There is no uniqueness constraint, so finalizing the
/// same path twice creates two records.
#[utoipa::path(
    post,
    path = "/api/video",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video record created", body = VideoRecord),
        (status = 400, description = "Missing or malformed file path", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        user_id = %identity.user_id,
        file_path = %request.file_path,
        operation = "create_video"
    )
)]
pub async fn create_video(
    identity: UserIdentity,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if request.file_path.is_empty() {
        return Err(HttpAppError(AppError::BadRequest(
            "File path is required".to_string(),
        )));
    }

    let name = record_name(&request.file_path);

    let video = state
        .db
        .video_repository
        .create(identity.user_id, name)
        .await
        .map_err(HttpAppError::from)?;

    tracing::info!(
        user_id = %identity.user_id,
        video_id = %video.id,
        file_path = %video.file_path,
        "Video record created"
    );

    Ok((StatusCode::CREATED, Json(video)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_name_strips_extension() {
        assert_eq!(record_name("clip.mp4"), "clip");
        assert_eq!(record_name("1700000000000_ride.mp4"), "1700000000000_ride");
    }

    #[test]
    fn test_record_name_keeps_inner_dots() {
        assert_eq!(record_name("archive.tar.gz"), "archive.tar");
    }

    #[test]
    fn test_record_name_without_extension() {
        assert_eq!(record_name("noext"), "noext");
        assert_eq!(record_name(".env"), ".env");
    }

    #[test]
    fn test_record_name_drops_directories() {
        assert_eq!(record_name("uploads/clip.mp4"), "clip");
    }
}
