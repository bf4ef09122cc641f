use axum::{
    extract::{Path, State},
    Extension,
};

use super::{ensure_manageable, load_user};
use crate::auth::Identity;
use crate::database::UserView;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/users/:id - Account record visible to the caller
pub async fn show(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> ApiResult<UserView> {
    let user = load_user(state.users.as_ref(), id).await?;
    ensure_manageable(&identity, &user)?;
    Ok(ApiResponse::success(user.view()))
}
