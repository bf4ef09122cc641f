// handlers/public/auth/logout.rs - POST /api/auth/logout handler

use axum::extract::State;

use crate::middleware::{clear_session_cookie, ApiResponse};
use crate::state::AppState;

/// POST /api/auth/logout - Clear the session cookie
///
/// Tokens are stateless, so this only tells the browser to forget it.
pub async fn logout(State(state): State<AppState>) -> ApiResponse<()> {
    ApiResponse::no_content().with_cookie(clear_session_cookie(state.config.security.require_https))
}
