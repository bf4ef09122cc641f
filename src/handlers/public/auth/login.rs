// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::verify_password;
use crate::database::UserView;
use crate::error::ApiError;
use crate::middleware::{session_cookie, ApiResponse, ApiResult};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserView,
    pub expires_in: i64,
}

/// POST /api/auth/login - Authenticate and receive a session token
///
/// Expected Input:
/// ```json
/// { "email": "admin@example.com", "password": "..." }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "user": { "id": 1, "email": "admin@example.com", "role": "admin", "condominiumId": 3, "authorized": true, ... },
///     "expires_in": 28800
///   }
/// }
/// ```
///
/// The token is also set as the `token` cookie. Disabled accounts still
/// receive a token; it carries `authorized: false` and the gate routes it
/// to the unauthorized page.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let email = payload.email.trim();
    if email.is_empty() {
        return Err(ApiError::field_error("email", "This field is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::field_error("password", "This field is required"));
    }

    let Some(user) = state.users.find_by_email(email).await? else {
        tracing::warn!("Login failed: unknown email '{}'", email);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!("Login failed: wrong password for user {}", user.id);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let issued = state.tokens.issue(&user.subject(), Utc::now().timestamp())?;

    if user.authorized {
        tracing::info!("Login: user {} ({}) signed in", user.id, user.role);
    } else {
        tracing::warn!("Login: disabled user {} signed in; session will be blocked", user.id);
    }

    let expires_in = state.tokens.ttl_secs();
    let cookie = session_cookie(&issued.token, expires_in, state.config.security.require_https);

    Ok(ApiResponse::success(SessionResponse {
        token: issued.token,
        user: user.view(),
        expires_in,
    })
    .with_cookie(cookie))
}
