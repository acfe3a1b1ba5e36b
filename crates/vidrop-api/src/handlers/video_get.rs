use crate::auth::models::UserIdentity;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use vidrop_core::models::VideoRecord;
use vidrop_core::AppError;

/// List the caller's videos, newest first
#[utoipa::path(
    get,
    path = "/api/video",
    tag = "videos",
    responses(
        (status = 200, description = "The caller's video records", body = Vec<VideoRecord>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %identity.user_id, operation = "list_videos")
)]
pub async fn list_videos(
    identity: UserIdentity,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let videos = state
        .db
        .video_repository
        .list_for_user(identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list videos");
            HttpAppError::from(e)
        })?;

    Ok(Json(videos))
}

/// Fetch one of the caller's videos by id
#[utoipa::path(
    get,
    path = "/api/video/{id}",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = VideoRecord),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state),
    fields(
        user_id = %identity.user_id,
        video_id = %id,
        operation = "get_video"
    )
)]
pub async fn get_video(
    identity: UserIdentity,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state
        .db
        .video_repository
        .find_for_user(id, identity.user_id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(Json(video))
}
