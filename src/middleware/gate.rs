use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use super::identity::{attach_identity_headers, session_token, strip_identity_headers};
use super::validate_user::revalidate;
use crate::config::GatewayConfig;
use crate::error::ApiError;
use crate::policy::{classify, evaluate, normalize_path, Denial, GateOutcome, Section, SectionKind};
use crate::state::AppState;

/// Authorization gate applied to every request.
///
/// Public paths pass through with any client-sent identity headers removed.
/// Protected paths are admitted with an [`Identity`](crate::auth::Identity)
/// in the request extensions and identity headers for the upstream, or are
/// denied with a redirect (pages) or a JSON error (API routes).
///
/// Only canonical paths are evaluated. A path with dot segments, doubled
/// slashes or encoded unreserved characters is answered with a permanent
/// redirect to its canonical form, so routing, the allow-list and the
/// upstream all see the same path.
pub async fn gate_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = match normalize_path(request.uri().path()) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("Gate reject: {} {}: {}", request.method(), request.uri().path(), e);
            return ApiError::bad_request(e.to_string()).into_response();
        }
    };
    if path != request.uri().path() {
        let target = match request.uri().query() {
            Some(query) => format!("{}?{}", path, query),
            None => path,
        };
        tracing::debug!("Gate canonicalize: {} -> {}", request.uri(), target);
        return Redirect::permanent(&target).into_response();
    }
    let token = classify(&path).and_then(|section| session_token(request.headers(), section.kind()));

    let outcome = evaluate(&path, token.as_deref(), &state.tokens, Utc::now().timestamp());

    match outcome {
        GateOutcome::Public => {
            strip_identity_headers(request.headers_mut());
            next.run(request).await
        }
        GateOutcome::Admit { section, identity, .. } => {
            if section.kind() == SectionKind::Api && state.config.security.verify_user_on_api {
                if let Err(e) = revalidate(state.users.as_ref(), &identity).await {
                    return e.into_response();
                }
            }

            tracing::debug!(
                "Gate admit: {} {} as user {} ({})",
                request.method(),
                path,
                identity.user_id,
                identity.role
            );
            attach_identity_headers(request.headers_mut(), &identity);
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        GateOutcome::Deny { section, denial } => {
            tracing::warn!("Gate deny: {} {} ({:?}): {}", request.method(), path, section, denial.reason());
            render_denial(&state.config.gateway, section, &denial)
        }
    }
}

/// Turn a denial into the response the client sees.
pub fn render_denial(gateway: &GatewayConfig, section: Section, denial: &Denial) -> Response {
    match section.kind() {
        SectionKind::Page => {
            let target = match denial {
                Denial::Unauthenticated(_) => &gateway.login_path,
                Denial::Blocked | Denial::WrongRole(_) => &gateway.unauthorized_path,
            };
            Redirect::temporary(target).into_response()
        }
        SectionKind::Api => match denial {
            Denial::Unauthenticated(_) => ApiError::unauthorized(denial.reason()).into_response(),
            Denial::Blocked | Denial::WrongRole(_) => ApiError::forbidden(denial.reason()).into_response(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, TokenError};
    use crate::config::AppConfig;
    use axum::http::{header, StatusCode};

    fn gateway() -> GatewayConfig {
        AppConfig::development().gateway
    }

    #[test]
    fn page_denials_redirect() {
        let login = render_denial(&gateway(), Section::Home, &Denial::Unauthenticated(TokenError::Expired));
        assert_eq!(login.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(login.headers()[header::LOCATION], "/login");

        let blocked = render_denial(&gateway(), Section::OwnerPortal, &Denial::Blocked);
        assert_eq!(blocked.headers()[header::LOCATION], "/unauthorized");

        let wrong = render_denial(&gateway(), Section::Superadmin, &Denial::WrongRole(Role::Admin));
        assert_eq!(wrong.headers()[header::LOCATION], "/unauthorized");
    }

    #[test]
    fn api_denials_are_json_errors() {
        let missing = render_denial(&gateway(), Section::Account, &Denial::Unauthenticated(TokenError::Missing));
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert!(missing.headers().get(header::LOCATION).is_none());

        let wrong = render_denial(&gateway(), Section::UserAdmin, &Denial::WrongRole(Role::Owner));
        assert_eq!(wrong.status(), StatusCode::FORBIDDEN);
    }
}
