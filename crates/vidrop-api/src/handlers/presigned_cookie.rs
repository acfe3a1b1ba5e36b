use crate::auth::models::UserIdentity;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use vidrop_core::AppError;

/// Set CDN playback cookies for the caller
///
/// Issues the three signed cookies (`CloudFront-Policy`,
/// `CloudFront-Signature`, `CloudFront-Key-Pair-Id`) granting access to
/// `users/{userId}/m3u8/*` on the CDN until the next local midnight. The
/// cookies are HttpOnly, Secure, Path=/, SameSite=Strict.
#[utoipa::path(
    get,
    path = "/api/video/presigned_cookie",
    tag = "videos",
    responses(
        (status = 200, description = "Cookies set", body = serde_json::Value),
        (status = 400, description = "Identity does not resolve to a user", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Signing failed", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %identity.user_id, operation = "presigned_cookie")
)]
pub async fn set_presigned_cookie(
    identity: UserIdentity,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    let user = state
        .db
        .user_repository
        .find_by_id(identity.user_id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::BadRequest("User ID is required".to_string()))?;

    let cookies = state
        .media
        .signer
        .access_cookies(user.id)
        .await
        .map_err(HttpAppError::from)?;

    let mut response = Json(serde_json::json!({ "ok": true })).into_response();
    for (name, value) in cookies.pairs() {
        let header_value = format!(
            "{}={}; HttpOnly; Secure; Path=/; SameSite=Strict",
            name, value
        );
        let header_value = HeaderValue::from_str(&header_value)
            .map_err(|e| AppError::Internal(format!("Invalid cookie header: {}", e)))?;
        response.headers_mut().append(header::SET_COOKIE, header_value);
    }

    tracing::info!(user_id = %user.id, "Issued CDN access cookies");

    Ok(response)
}
