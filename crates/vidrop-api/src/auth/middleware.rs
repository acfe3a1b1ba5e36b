use crate::auth::jwt::JwtService;
use crate::auth::models::UserIdentity;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use vidrop_core::AppError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_service: Arc<JwtService>,
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    if !auth_header.starts_with("Bearer ") {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    }

    let token = &auth_header[7..]; // Remove "Bearer " prefix

    let claims = match auth_state.jwt_service.validate(token) {
        Ok(claims) => claims,
        Err(err) => return HttpAppError(err).into_response(),
    };

    let identity = UserIdentity {
        user_id: claims.sub,
        email: claims.email,
    };
    request.extensions_mut().insert(identity);

    next.run(request).await
}
