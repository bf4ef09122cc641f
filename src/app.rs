use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::gateway;
use crate::handlers;
use crate::middleware::gate_middleware;
use crate::state::AppState;

/// Full application router: local auth API, gate, and upstream fallback.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::system::root))
        .route("/health", get(handlers::public::system::health))
        .merge(auth_public_routes())
        // Gated
        .merge(auth_routes())
        .merge(user_routes())
        // Everything else belongs to the portal application
        .fallback(gateway::forward)
        .layer(from_fn_with_state(state.clone(), gate_middleware));

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config.security.cors_origins));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
}

fn auth_routes() -> Router<AppState> {
    use handlers::protected::auth;

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/auth/refresh", post(auth::refresh))
}

fn user_routes() -> Router<AppState> {
    use handlers::protected::users;

    Router::new()
        .route("/api/users/:id", get(users::show))
        .route("/api/users/:id/authorization", put(users::update_authorization))
}

/// Credentialed CORS for the configured portal origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(cors_origins(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Origins usable with `allow_credentials`. A wildcard would make
/// tower-http panic, so it is skipped like any unparsable entry.
fn cors_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .map(|origin| origin.trim())
        .filter_map(|origin| {
            if origin == "*" {
                tracing::warn!("Ignoring wildcard CORS origin; credentialed CORS needs explicit origins");
                return None;
            }
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            }
        })
        .collect()
}
