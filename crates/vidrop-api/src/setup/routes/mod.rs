//! Route configuration and setup.
//!
//! Health checks live in [health](health); everything under `/api` sits behind
//! the bearer-token middleware.

mod health;

use crate::auth::jwt::JwtService;
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::constants::{API_PREFIX, MAX_JSON_BODY_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use vidrop_core::Config;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = setup_auth_middleware(config);

    let public_routes = public_routes(state.clone());
    let protected_routes = protected_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(Arc::new(auth_state), auth_middleware),
    );

    let app = public_routes
        .merge(protected_routes)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(RequestBodyLimitLayer::new(MAX_JSON_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins().iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

fn setup_auth_middleware(config: &Config) -> AuthState {
    AuthState {
        jwt_service: Arc::new(JwtService::new(
            config.jwt_secret(),
            config.jwt_expiry_hours(),
        )),
    }
}

fn public_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state)
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/video/presigned_url", API_PREFIX),
            post(handlers::presigned_url::create_presigned_url),
        )
        .route(
            &format!("{}/video/presigned_url", API_PREFIX),
            get(handlers::presigned_url::legacy_presigned_url),
        )
        .route(
            &format!("{}/video/presigned_cookie", API_PREFIX),
            get(handlers::presigned_cookie::set_presigned_cookie),
        )
        .route(
            &format!("{}/video", API_PREFIX),
            post(handlers::video_create::create_video),
        )
        .route(
            &format!("{}/video", API_PREFIX),
            get(handlers::video_get::list_videos),
        )
        .route(
            &format!("{}/video/{{id}}", API_PREFIX),
            get(handlers::video_get::get_video),
        )
        .with_state(state)
}
