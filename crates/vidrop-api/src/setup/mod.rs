//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::{AppState, DbState, MediaState};
use anyhow::{Context, Result};
use std::sync::Arc;
use vidrop_cdn::CookieSigner;
use vidrop_core::Config;
use vidrop_db::{UserRepository, VideoRepository};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    // Setup database
    let pool = database::setup_database(&config).await?;

    // Setup storage
    let storage = storage::setup_storage(&config).await?;

    // The signer reads the private key per call, so a missing file surfaces at
    // first use rather than here; construction itself cannot fail.
    let signer = Arc::new(CookieSigner::new(
        config.cdn_domain().to_string(),
        config.cdn_key_pair_id().to_string(),
        config.cdn_private_key_path(),
    ));

    let state = Arc::new(AppState {
        db: DbState {
            pool: pool.clone(),
            user_repository: UserRepository::new(pool.clone()),
            video_repository: VideoRepository::new(pool),
        },
        media: MediaState { storage, signer },
        is_production: config.is_production(),
        config,
    });

    // Setup routes
    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}
