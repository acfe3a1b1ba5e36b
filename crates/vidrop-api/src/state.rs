//! Application state and sub-state extractors.
//!
//! AppState is split into sub-states so handlers can extract only what they need
//! via Axum's `FromRef`.

use sqlx::PgPool;
use std::sync::Arc;
use vidrop_cdn::CookieSigner;
use vidrop_core::Config;
use vidrop_db::{UserRepository, VideoRepository};
use vidrop_storage::Storage;

// ----- Sub-state types -----

/// Database pool and repositories.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub user_repository: UserRepository,
    pub video_repository: VideoRepository,
}

/// Storage client and CDN signer, shared across all requests.
///
/// The storage client is constructed once at startup; rebuilding it per
/// request causes connection errors under load.
#[derive(Clone)]
pub struct MediaState {
    pub storage: Arc<dyn Storage>,
    pub signer: Arc<CookieSigner>,
}

// ----- AppState -----

/// Main application state: aggregates sub-states for dependency injection.
#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub media: MediaState,
    pub config: Config,
    pub is_production: bool,
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for DbState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for MediaState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.media.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
