// handlers/protected/auth/whoami.rs - GET /api/auth/whoami handler

use axum::Extension;

use crate::auth::Identity;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/auth/whoami - Identity of the current session
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": { "user_id": 7, "email": "ana@example.com", "role": "owner", "condominium_id": 3 }
/// }
/// ```
pub async fn whoami(Extension(identity): Extension<Identity>) -> ApiResult<Identity> {
    Ok(ApiResponse::success(identity))
}
