//! Domain methods for the vidrop API client.
//!
//! Record types are re-used from `vidrop_core::models`; the credential wrapper
//! returned by the presign endpoint is defined here.

use anyhow::{Context, Result};
use uuid::Uuid;
use vidrop_core::models::VideoRecord;

use crate::{ApiClient, API_PREFIX};

/// Upload credential issued by `POST /api/video/presigned_url`.
///
/// `file_name` is the server-generated unique object name; the client must
/// echo it back unchanged when finalizing the video record.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCredential {
    pub presigned_url: String,
    pub file_name: String,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct FilePathBody<'a> {
    file_path: &'a str,
}

impl ApiClient {
    /// Request an upload credential for a new video file.
    ///
    /// The returned URL accepts exactly one PUT of the file bytes; the
    /// server never sees the bytes themselves.
    pub async fn request_upload_credential(&self, file_path: &str) -> Result<UploadCredential> {
        self.post_json(
            &format!("{}/video/presigned_url", API_PREFIX),
            &FilePathBody { file_path },
        )
        .await
    }

    /// Legacy presign variant: GET with `?filePath=` returns only the URL and
    /// writes under the caller's root prefix without a timestamped name.
    pub async fn presigned_upload_url(&self, file_path: &str) -> Result<String> {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct PresignedUrlResponse {
            presigned_url: String,
        }

        let response: PresignedUrlResponse = self
            .get(
                &format!("{}/video/presigned_url", API_PREFIX),
                &[("filePath", file_path.to_string())],
            )
            .await?;
        Ok(response.presigned_url)
    }

    /// Finalize a completed upload: creates the metadata record for the
    /// object named by `file_name` from the upload credential.
    pub async fn finalize_video(&self, file_name: &str) -> Result<VideoRecord> {
        self.post_json(
            &format!("{}/video", API_PREFIX),
            &FilePathBody {
                file_path: file_name,
            },
        )
        .await
    }

    /// List the caller's videos, newest first.
    pub async fn list_videos(&self) -> Result<Vec<VideoRecord>> {
        self.get(&format!("{}/video", API_PREFIX), &[]).await
    }

    /// Fetch a single video record owned by the caller.
    pub async fn get_video(&self, id: Uuid) -> Result<VideoRecord> {
        self.get(&format!("{}/video/{}", API_PREFIX, id), &[]).await
    }

    /// Request CDN playback cookies. Returns the raw `Set-Cookie` header
    /// values so the caller can install them wherever playback happens.
    pub async fn request_playback_cookies(&self) -> Result<Vec<String>> {
        let url = self.build_url(&format!("{}/video/presigned_cookie", API_PREFIX));
        let request = self.apply_auth(self.client().get(&url));

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let cookies = response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok().map(str::to_string))
            .collect();
        Ok(cookies)
    }
}
