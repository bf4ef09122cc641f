// handlers/public/system.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "condo-gate",
            "version": version,
            "description": "Authorization gate for the condominium portals",
            "endpoints": {
                "health": "/health (public)",
                "login": "/api/auth/login (public - token acquisition)",
                "logout": "/api/auth/logout (public)",
                "account": "/api/auth/whoami, /api/auth/refresh (any signed-in role)",
                "users": "/api/users/:id[/authorization] (admin, superadmin)",
                "pages": "/home, /admin/*, /owner/*, /supplier/*, /superadmin/*, /profile (gated, forwarded upstream)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.users.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
