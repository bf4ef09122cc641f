use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Uri},
    response::Response,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

const FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Fallback handler: forward the request to the upstream application.
///
/// Runs after the gate, so identity headers on the request are the gate's
/// own.
pub async fn forward(State(state): State<AppState>, request: Request) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let limit = state.config.api.max_request_size_bytes;

    if declared_length(&parts.headers).is_some_and(|len| len > limit) {
        return Err(ApiError::payload_too_large(format!("Request body exceeds {} bytes", limit)));
    }

    let url = upstream_url(&state.config.gateway.upstream_url, &parts.uri)?;
    let body = axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| ApiError::payload_too_large(format!("Request body exceeds {} bytes", limit)))?;

    let mut headers = request_headers(&parts.headers);
    let request_id = ensure_request_id(&mut headers);

    let upstream = state
        .http
        .request(parts.method.clone(), url.as_str())
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Upstream request {} {} [{}] failed: {}", parts.method, url, request_id, e);
            ApiError::bad_gateway("Upstream application unavailable")
        })?;

    let status = upstream.status();
    let headers = response_headers(upstream.headers());
    let bytes = upstream.bytes().await.map_err(|e| {
        tracing::error!("Reading upstream response for {} failed: {}", url, e);
        ApiError::bad_gateway("Upstream application sent an incomplete response")
    })?;

    tracing::debug!("Forwarded {} {} [{}] -> {}", parts.method, parts.uri, request_id, status);

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Join the upstream base with the request's path and query.
pub fn upstream_url(base: &str, uri: &Uri) -> Result<url::Url, ApiError> {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let joined = format!("{}{}", base.trim_end_matches('/'), path_and_query);
    url::Url::parse(&joined).map_err(|e| {
        tracing::error!("Cannot build upstream URL from '{}': {}", joined, e);
        ApiError::internal_server_error("Gateway upstream is misconfigured")
    })
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Copy of the client's headers minus hop-by-hop, `host` and body framing.
pub fn request_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut headers = strip_hop_by_hop(incoming);
    if let Some(host) = incoming.get(header::HOST) {
        headers.insert(FORWARDED_HOST, host.clone());
    }
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    headers
}

/// Keep the client's `x-request-id` or assign a fresh one, returning it.
pub fn ensure_request_id(headers: &mut HeaderMap) -> String {
    if let Some(id) = headers.get(&REQUEST_ID).and_then(|v| v.to_str().ok()) {
        if !id.trim().is_empty() {
            return id.to_string();
        }
    }
    let id = Uuid::new_v4().to_string();
    if let Ok(value) = HeaderValue::from_str(&id) {
        headers.insert(REQUEST_ID, value);
    }
    id
}

/// Copy of the upstream's headers minus hop-by-hop and body framing.
pub fn response_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut headers = strip_hop_by_hop(incoming);
    headers.remove(header::CONTENT_LENGTH);
    headers
}

fn strip_hop_by_hop(incoming: &HeaderMap) -> HeaderMap {
    let mut headers = incoming.clone();

    // Headers named by `Connection` are hop-by-hop too
    let named: Vec<HeaderName> = incoming
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in HOP_BY_HOP.into_iter().chain(named) {
        headers.remove(name);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_path_and_query() {
        let uri: Uri = "/owner/receipts?page=2".parse().unwrap();
        let url = upstream_url("http://app:3000/", &uri).unwrap();
        assert_eq!(url.as_str(), "http://app:3000/owner/receipts?page=2");

        let uri: Uri = "/home".parse().unwrap();
        let url = upstream_url("http://app:3000/portal", &uri).unwrap();
        assert_eq!(url.as_str(), "http://app:3000/portal/home");
    }

    #[test]
    fn request_headers_drop_connection_scoped_values() {
        let mut incoming = HeaderMap::new();
        incoming.insert(header::HOST, HeaderValue::from_static("condo.example.com"));
        incoming.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-trace-hop"));
        incoming.insert(HeaderName::from_static("x-trace-hop"), HeaderValue::from_static("1"));
        incoming.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));
        incoming.insert(header::COOKIE, HeaderValue::from_static("token=abc"));

        let headers = request_headers(&incoming);
        assert!(headers.get(header::HOST).is_none());
        assert!(headers.get(header::CONNECTION).is_none());
        assert!(headers.get("x-trace-hop").is_none());
        assert!(headers.get(header::CONTENT_LENGTH).is_none());
        assert_eq!(headers[FORWARDED_HOST], "condo.example.com");
        assert_eq!(headers[header::COOKIE], "token=abc");
    }

    #[test]
    fn request_id_is_kept_or_assigned() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID, HeaderValue::from_static("abc-123"));
        assert_eq!(ensure_request_id(&mut headers), "abc-123");

        let mut headers = HeaderMap::new();
        let assigned = ensure_request_id(&mut headers);
        assert_eq!(assigned.len(), 36);
        assert_eq!(headers[REQUEST_ID], assigned.as_str());
    }

    #[test]
    fn response_headers_keep_cookies_and_type() {
        let mut incoming = HeaderMap::new();
        incoming.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        incoming.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        incoming.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        incoming.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));

        let headers = response_headers(&incoming);
        assert!(headers.get(header::TRANSFER_ENCODING).is_none());
        assert_eq!(headers[header::CONTENT_TYPE], "text/html");
        assert_eq!(headers.get_all(header::SET_COOKIE).iter().count(), 2);
    }
}
