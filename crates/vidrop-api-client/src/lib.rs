//! Shared HTTP client for the vidrop API.
//!
//! Provides a thin bearer-auth client with generic GET/POST helpers, typed
//! domain methods (upload credentials, video finalization, listing, playback
//! cookies), and the upload orchestrator that drives the credential, byte
//! transfer, and finalize steps as one observable flow.

pub mod api;
pub mod upload;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Route prefix shared by every API endpoint.
pub const API_PREFIX: &str = "/api";

/// HTTP client for the vidrop API authenticating with a bearer JWT.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: String, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Create client from environment: VIDROP_API_URL (or API_URL) for the
    /// base URL and VIDROP_API_TOKEN (or JWT_TOKEN) for the bearer token.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("VIDROP_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| "http://localhost:4000".to_string());

        let token = std::env::var("VIDROP_API_TOKEN")
            .or_else(|_| std::env::var("JWT_TOKEN"))
            .context("Missing token. Set VIDROP_API_TOKEN or JWT_TOKEN")?;

        Self::new(base_url, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("Authorization", format!("Bearer {}", self.token))
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);
        request = self.apply_auth(request);

        if !query.is_empty() {
            request = request.query(query);
        }

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

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        let request = self.client.post(&url).json(body);
        let request = self.apply_auth(request);

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

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }

    /// Raw client for custom requests. Caller must apply auth via build_url and headers.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

// Re-export domain types for convenience.
pub use api::UploadCredential;
pub use upload::{UploadError, UploadSource, UploadState, VideoUploader};
pub use vidrop_core::models::VideoRecord;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:4000/".to_string(), "token".to_string())
            .expect("client should build");
        assert_eq!(client.base_url(), "http://localhost:4000");
        assert_eq!(client.build_url("/api/video"), "http://localhost:4000/api/video");
    }

    #[test]
    fn test_build_url_joins_prefix_paths() {
        let client = ApiClient::new("https://api.example.com".to_string(), "token".to_string())
            .expect("client should build");
        assert_eq!(
            client.build_url(&format!("{}/video/presigned_url", API_PREFIX)),
            "https://api.example.com/api/video/presigned_url"
        );
    }
}
