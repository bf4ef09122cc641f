use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

use crate::auth::Identity;
use crate::policy::SectionKind;

pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");
pub const USER_EMAIL_HEADER: HeaderName = HeaderName::from_static("x-user-email");
pub const USER_ROLE_HEADER: HeaderName = HeaderName::from_static("x-user-role");
pub const CONDOMINIUM_ID_HEADER: HeaderName = HeaderName::from_static("x-condominium-id");

/// Name of the cookie the portals keep the session token in.
pub const TOKEN_COOKIE: &str = "token";

const IDENTITY_HEADERS: [HeaderName; 4] = [
    USER_ID_HEADER,
    USER_EMAIL_HEADER,
    USER_ROLE_HEADER,
    CONDOMINIUM_ID_HEADER,
];

/// Remove identity headers a client may have sent itself.
pub fn strip_identity_headers(headers: &mut HeaderMap) {
    for name in IDENTITY_HEADERS {
        headers.remove(name);
    }
}

/// Replace identity headers with the values of an admitted session.
pub fn attach_identity_headers(headers: &mut HeaderMap, identity: &Identity) {
    strip_identity_headers(headers);
    headers.insert(USER_ID_HEADER, HeaderValue::from(identity.user_id));
    headers.insert(USER_ROLE_HEADER, HeaderValue::from_static(identity.role.as_str()));
    // Emails with non-visible characters are simply not forwarded
    if let Ok(email) = HeaderValue::from_str(&identity.email) {
        headers.insert(USER_EMAIL_HEADER, email);
    }
    if let Some(condominium_id) = identity.condominium_id {
        headers.insert(CONDOMINIUM_ID_HEADER, HeaderValue::from(condominium_id));
    }
}

/// Token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer "))?;
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Token from the `token` cookie.
pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Pages prefer the cookie, API routes prefer the bearer header.
pub fn session_token(headers: &HeaderMap, kind: SectionKind) -> Option<String> {
    match kind {
        SectionKind::Page => cookie_token(headers).or_else(|| bearer_token(headers)),
        SectionKind::Api => bearer_token(headers).or_else(|| cookie_token(headers)),
    }
}

/// `Set-Cookie` value carrying a session token.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        TOKEN_COOKIE,
        token,
        max_age_secs.max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
