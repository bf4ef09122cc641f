#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use condo_gate::auth::{Role, TokenService};
use condo_gate::config::AppConfig;
use condo_gate::database::{MemoryUserStore, User};
use condo_gate::{app, AppState};

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "correct horse battery";

/// Seeded accounts. Condominium 1 unless noted.
pub struct Accounts {
    pub admin: User,
    pub owner: User,
    pub supplier: User,
    pub superadmin: User,
    pub disabled_owner: User,
    pub other_admin: User,
    pub other_owner: User,
}

pub struct TestGate {
    pub app: Router,
    pub users: Arc<MemoryUserStore>,
    pub tokens: TokenService,
    pub accounts: Accounts,
    pub config: AppConfig,
}

/// Upstream stand-in that echoes what the gate forwarded.
pub async fn spawn_upstream() -> Result<SocketAddr> {
    async fn echo(request: Request<Body>) -> Json<Value> {
        let (parts, body) = request.into_parts();
        let headers = {
            let header = |name: &str| {
                parts
                    .headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            json!({
                "x-user-id": header("x-user-id"),
                "x-user-email": header("x-user-email"),
                "x-user-role": header("x-user-role"),
                "x-condominium-id": header("x-condominium-id"),
                "x-forwarded-host": header("x-forwarded-host"),
                "x-request-id": header("x-request-id"),
                "cookie": header("cookie"),
            })
        };
        let body = to_bytes(body, usize::MAX).await.unwrap_or_default();

        Json(json!({
            "method": parts.method.to_string(),
            "path": parts.uri.path(),
            "query": parts.uri.query(),
            "headers": headers,
            "body": String::from_utf8_lossy(&body),
        }))
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let upstream = Router::new().fallback(echo);
    tokio::spawn(async move {
        let _ = axum::serve(listener, upstream).await;
    });
    Ok(addr)
}

/// An address nothing listens on.
pub async fn dead_upstream() -> Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

pub fn test_config(upstream: SocketAddr) -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = SECRET.to_string();
    config.security.jwt_expiry_hours = 1;
    config.gateway.upstream_url = format!("http://{}", upstream);
    config.gateway.upstream_timeout_secs = 5;
    config.api.max_request_size_bytes = 64 * 1024;
    config
}

pub async fn gate() -> Result<TestGate> {
    let upstream = spawn_upstream().await?;
    gate_with(test_config(upstream))
}

pub fn gate_with(config: AppConfig) -> Result<TestGate> {
    let users = Arc::new(MemoryUserStore::new());
    let accounts = Accounts {
        admin: users.add("admin@condo.test", PASSWORD, Role::Admin, Some(1), true)?,
        owner: users.add("owner@condo.test", PASSWORD, Role::Owner, Some(1), true)?,
        supplier: users.add("supplier@condo.test", PASSWORD, Role::Supplier, Some(1), true)?,
        superadmin: users.add("root@condo.test", PASSWORD, Role::Superadmin, None, true)?,
        disabled_owner: users.add("disabled@condo.test", PASSWORD, Role::Owner, Some(1), false)?,
        other_admin: users.add("admin@other.test", PASSWORD, Role::Admin, Some(2), true)?,
        other_owner: users.add("owner@other.test", PASSWORD, Role::Owner, Some(2), true)?,
    };

    let state = AppState::new(config.clone(), users.clone())?;
    let tokens = state.tokens.clone();

    Ok(TestGate {
        app: app(state),
        users,
        tokens,
        accounts,
        config,
    })
}

impl TestGate {
    pub async fn send(&self, request: Request<Body>) -> Result<Response> {
        let response = self.app.clone().oneshot(request).await?;
        Ok(response)
    }

    pub fn token_for(&self, user: &User) -> String {
        self.tokens
            .issue(&user.subject(), Utc::now().timestamp())
            .map(|issued| issued.token)
            .unwrap_or_default()
    }

    /// Token that expired a minute ago.
    pub fn expired_token_for(&self, user: &User) -> String {
        let issued_at = Utc::now().timestamp() - 3600;
        self.tokens
            .issue_with_ttl(&user.subject(), issued_at, 3600 - 60)
            .map(|issued| issued.token)
            .unwrap_or_default()
    }

    /// Browser-style page request, session in the `token` cookie.
    pub async fn page(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("token={}", token));
        }
        self.send(builder.body(Body::empty())?).await
    }

    /// API request, session as a bearer token.
    pub async fn api(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<Response> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value)?)
            }
            None => Body::empty(),
        };
        self.send(builder.body(body)?).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Response> {
        self.api(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }
}

pub async fn json_body(response: Response) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    serde_json::from_slice(&bytes).with_context(|| {
        format!("response body is not JSON: {}", String::from_utf8_lossy(&bytes))
    })
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn assert_redirect(response: &Response, target: &str) {
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(response), Some(target));
}
