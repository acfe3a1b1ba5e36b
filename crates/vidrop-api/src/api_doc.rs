//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use vidrop_core::models;

/// Returns the OpenAPI spec served at /api/openapi.json.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidrop API",
        version = "0.1.0",
        description = "Video upload service: presigned direct-to-storage uploads, metadata finalization, and CDN playback cookie issuance. All endpoints except /health and the docs require a bearer token."
    ),
    paths(
        handlers::presigned_url::create_presigned_url,
        handlers::presigned_url::legacy_presigned_url,
        handlers::video_create::create_video,
        handlers::video_get::list_videos,
        handlers::video_get::get_video,
        handlers::presigned_cookie::set_presigned_cookie,
    ),
    components(
        schemas(
            // Core models
            models::VideoRecord,
            models::User,
            // Request/response bodies
            handlers::presigned_url::PresignedUrlRequest,
            handlers::presigned_url::PresignedUrlResponse,
            handlers::presigned_url::LegacyPresignedUrlResponse,
            handlers::video_create::CreateVideoRequest,
            // Error
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "videos", description = "Video upload, metadata, and playback authorization operations")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_contains_all_routes() {
        let spec = get_openapi_spec();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/video"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/video/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/video/presigned_url"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/video/presigned_cookie"));
    }
}
