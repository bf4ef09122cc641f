// handlers/protected/users/authorization.rs - PUT /api/users/:id/authorization

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;

use super::{ensure_manageable, load_user};
use crate::auth::Identity;
use crate::database::UserView;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuthorizationRequest {
    pub authorized: bool,
}

/// PUT /api/users/:id/authorization - Enable or disable an account
///
/// Expected Input:
/// ```json
/// { "authorized": false }
/// ```
///
/// A disabled account keeps signing in, but every gated page redirects it
/// to the unauthorized page and API calls are refused with 403.
pub async fn update_authorization(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
    payload: Result<Json<AuthorizationRequest>, JsonRejection>,
) -> ApiResult<UserView> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    if id == identity.user_id {
        return Err(ApiError::forbidden("You cannot change your own authorization"));
    }

    let target = load_user(state.users.as_ref(), id).await?;
    ensure_manageable(&identity, &target)?;

    let updated = state.users.set_authorized(id, payload.authorized).await?;
    tracing::info!(
        "User {} set authorized={} for user {}",
        identity.user_id,
        updated.authorized,
        updated.id
    );

    Ok(ApiResponse::success(updated.view()))
}
