//! Client-side upload orchestration.
//!
//! Drives the three-step flow behind a single call: request an upload
//! credential, PUT the file bytes straight to storage, then finalize the
//! metadata record. State and progress are observable through
//! `tokio::sync::watch` channels so a caller can render the flow without
//! polling the uploader.

use std::sync::{Mutex, PoisonError};

use anyhow::Context;
use bytes::Bytes;
use futures::stream;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vidrop_core::constants::ACCEPTED_VIDEO_CONTENT_TYPE;
use vidrop_core::models::VideoRecord;

use crate::ApiClient;

/// Bytes handed to the HTTP stack per progress tick.
const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Phase of a single upload flow.
///
/// The flow moves strictly forward: `Idle` through `FinalizingRecord` to
/// `Done`, or to `Failed` from any non-terminal phase. A failed or cancelled
/// flow restarts from `Idle`; there is no resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    RequestingCredential,
    UploadingBytes,
    FinalizingRecord,
    Done,
    Failed,
}

/// A file selected for upload, held in memory.
#[derive(Debug, Clone)]
pub struct UploadSource {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadSource {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// Why an upload flow ended without producing a video record.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The selection was rejected before any network traffic.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
    /// Another flow is still running on this uploader.
    #[error("An upload is already in progress")]
    AlreadyRunning,
    #[error("Failed to request upload credential")]
    Credential(#[source] anyhow::Error),
    #[error("Upload failed: {0}")]
    Upload(String),
    /// `cancel` was called while the flow was in flight.
    #[error("Upload cancelled")]
    Cancelled,
    #[error("Failed to finalize video record")]
    Finalize(#[source] anyhow::Error),
}

/// Drives one upload flow at a time against the API and storage.
///
/// The byte transfer goes through a dedicated client without a request
/// timeout; large files would trip the API client's 60 second limit.
pub struct VideoUploader {
    api: ApiClient,
    storage_client: Client,
    state_tx: watch::Sender<UploadState>,
    state_rx: watch::Receiver<UploadState>,
    progress_tx: watch::Sender<u8>,
    progress_rx: watch::Receiver<u8>,
    cancel: Mutex<CancellationToken>,
    flow: tokio::sync::Mutex<()>,
}

impl VideoUploader {
    pub fn new(api: ApiClient) -> anyhow::Result<Self> {
        let storage_client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        let (state_tx, state_rx) = watch::channel(UploadState::Idle);
        let (progress_tx, progress_rx) = watch::channel(0);

        Ok(Self {
            api,
            storage_client,
            state_tx,
            state_rx,
            progress_tx,
            progress_rx,
            cancel: Mutex::new(CancellationToken::new()),
            flow: tokio::sync::Mutex::new(()),
        })
    }

    /// Watch the flow phase. Receivers see the latest value.
    pub fn state(&self) -> watch::Receiver<UploadState> {
        self.state_rx.clone()
    }

    /// Watch upload progress as a percentage from 0 to 100.
    ///
    /// During `UploadingBytes` the value tracks bytes handed to the HTTP
    /// stack over the total file size; `Done` always reports 100.
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress_rx.clone()
    }

    pub fn current_state(&self) -> UploadState {
        *self.state_rx.borrow()
    }

    /// Aborts the in-flight flow. The running `upload` call then reports
    /// `Failed` and returns `UploadError::Cancelled`. No-op when nothing
    /// is in flight.
    pub fn cancel(&self) {
        self.cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    /// Run the full upload flow for one file.
    ///
    /// Validation happens before any network call: an invalid selection
    /// returns `InvalidSelection` and leaves the flow in `Idle`. A failure in
    /// any later step moves the flow to `Failed`; the next call starts over
    /// from `Idle`.
    pub async fn upload(&self, source: UploadSource) -> Result<VideoRecord, UploadError> {
        let _flow = self.flow.try_lock().map_err(|_| UploadError::AlreadyRunning)?;

        self.state_tx.send_replace(UploadState::Idle);
        self.progress_tx.send_replace(0);
        validate_source(&source)?;

        let token = self.reset_token();

        self.state_tx.send_replace(UploadState::RequestingCredential);
        debug!(
            file_name = %source.file_name,
            size = source.data.len(),
            "Requesting upload credential"
        );
        let credential = match self.api.request_upload_credential(&source.file_name).await {
            Ok(credential) => credential,
            Err(e) => return Err(self.fail(UploadError::Credential(e))),
        };
        if credential.presigned_url.is_empty() {
            return Err(self.fail(UploadError::Credential(anyhow::anyhow!(
                "credential response contained no URL"
            ))));
        }

        self.state_tx.send_replace(UploadState::UploadingBytes);
        if let Err(e) = self
            .put_bytes(&credential.presigned_url, &source, &token)
            .await
        {
            return Err(self.fail(e));
        }

        self.state_tx.send_replace(UploadState::FinalizingRecord);
        let record = match self.api.finalize_video(&credential.file_name).await {
            Ok(record) => record,
            Err(e) => return Err(self.fail(UploadError::Finalize(e))),
        };

        self.progress_tx.send_replace(100);
        self.state_tx.send_replace(UploadState::Done);
        info!(video_id = %record.id, file_path = %record.file_path, "Upload complete");
        Ok(record)
    }

    /// PUT the file bytes to the presigned URL, streaming in chunks so the
    /// progress channel updates as the transfer advances.
    async fn put_bytes(
        &self,
        url: &str,
        source: &UploadSource,
        token: &CancellationToken,
    ) -> Result<(), UploadError> {
        let total = source.data.len();
        let progress = self.progress_tx.clone();
        let body = stream::unfold((source.data.clone(), 0usize), move |(data, sent)| {
            let progress = progress.clone();
            async move {
                if sent >= data.len() {
                    return None;
                }
                let end = usize::min(sent + UPLOAD_CHUNK_BYTES, data.len());
                let chunk = data.slice(sent..end);
                progress.send_replace(percent_sent(end, data.len()));
                Some((Ok::<Bytes, std::io::Error>(chunk), (data, end)))
            }
        });

        let request = self
            .storage_client
            .put(url)
            .header(CONTENT_TYPE, source.content_type.as_str())
            .header(CONTENT_LENGTH, total)
            .body(reqwest::Body::wrap_stream(body));

        let response = tokio::select! {
            _ = token.cancelled() => return Err(UploadError::Cancelled),
            result = request.send() => {
                result.map_err(|e| UploadError::Upload(format!("request failed: {}", e)))?
            }
        };

        if !response.status().is_success() {
            return Err(UploadError::Upload(format!(
                "storage returned status {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Installs a fresh cancellation token so an earlier `cancel` cannot
    /// abort a later flow.
    fn reset_token(&self) -> CancellationToken {
        let fresh = CancellationToken::new();
        let mut guard = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = fresh.clone();
        fresh
    }

    fn fail(&self, error: UploadError) -> UploadError {
        warn!(error = %error, "Upload flow failed");
        self.state_tx.send_replace(UploadState::Failed);
        error
    }
}

fn validate_source(source: &UploadSource) -> Result<(), UploadError> {
    if source.file_name.trim().is_empty() {
        return Err(UploadError::InvalidSelection(
            "file name is empty".to_string(),
        ));
    }
    if source.data.is_empty() {
        return Err(UploadError::InvalidSelection("file is empty".to_string()));
    }
    if source.content_type != ACCEPTED_VIDEO_CONTENT_TYPE {
        return Err(UploadError::InvalidSelection(format!(
            "unsupported content type '{}', only '{}' is accepted",
            source.content_type, ACCEPTED_VIDEO_CONTENT_TYPE
        )));
    }
    Ok(())
}

fn percent_sent(sent: usize, total: usize) -> u8 {
    ((sent as u64 * 100) / total as u64) as u8
}
