// handlers/protected/auth/refresh.rs - POST /api/auth/refresh handler

use axum::{extract::State, Extension};
use chrono::Utc;

use crate::auth::Identity;
use crate::error::ApiError;
use crate::handlers::public::auth::SessionResponse;
use crate::middleware::{session_cookie, ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /api/auth/refresh - Re-issue the session token with a new expiry
///
/// Claims are rebuilt from the stored account, so role or condominium
/// changes made since login are picked up.
pub async fn refresh(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<SessionResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    let issued = state.tokens.issue(&user.subject(), Utc::now().timestamp())?;
    tracing::info!("Refreshed session for user {}", user.id);

    let expires_in = state.tokens.ttl_secs();
    let cookie = session_cookie(&issued.token, expires_in, state.config.security.require_https);

    Ok(ApiResponse::success(SessionResponse {
        token: issued.token,
        user: user.view(),
        expires_in,
    })
    .with_cookie(cookie))
}
