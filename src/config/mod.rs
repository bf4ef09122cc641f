use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub gateway: GatewayConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub require_https: bool,
    /// Re-check the user store on every admitted API request.
    pub verify_user_on_api: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub upstream_url: String,
    pub login_path: String,
    pub unauthorized_path: String,
    pub upstream_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET is not configured")]
    MissingSecret,
    #[error("invalid upstream URL '{0}'")]
    InvalidUpstream(String),
    #[error("gateway path '{0}' must start with '/'")]
    InvalidGatewayPath(String),
    #[error("CORS origin '*' cannot be used with credentialed requests")]
    WildcardCorsOrigin,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(v) = env::var("CONDO_GATE_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_REQUIRE_HTTPS") {
            self.security.require_https = v.parse().unwrap_or(self.security.require_https);
        }
        if let Ok(v) = env::var("SECURITY_VERIFY_USER_ON_API") {
            self.security.verify_user_on_api = v.parse().unwrap_or(self.security.verify_user_on_api);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Gateway overrides
        if let Ok(v) = env::var("UPSTREAM_URL") {
            self.gateway.upstream_url = v;
        }
        if let Ok(v) = env::var("GATEWAY_LOGIN_PATH") {
            self.gateway.login_path = v;
        }
        if let Ok(v) = env::var("GATEWAY_UNAUTHORIZED_PATH") {
            self.gateway.unauthorized_path = v;
        }
        if let Ok(v) = env::var("GATEWAY_UPSTREAM_TIMEOUT_SECS") {
            self.gateway.upstream_timeout_secs = v.parse().unwrap_or(self.gateway.upstream_timeout_secs);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // API overrides
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        self
    }

    /// Startup checks for settings the gate cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        url::Url::parse(&self.gateway.upstream_url)
            .map_err(|_| ConfigError::InvalidUpstream(self.gateway.upstream_url.clone()))?;
        for path in [&self.gateway.login_path, &self.gateway.unauthorized_path] {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidGatewayPath(path.clone()));
            }
        }
        if self.security.enable_cors && self.security.cors_origins.iter().any(|o| o.trim() == "*") {
            return Err(ConfigError::WildcardCorsOrigin);
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8080 },
            security: SecurityConfig {
                jwt_secret: "condo-gate-development-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                require_https: false,
                verify_user_on_api: true,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
            gateway: GatewayConfig {
                upstream_url: "http://localhost:3000".to_string(),
                login_path: "/login".to_string(),
                unauthorized_path: "/unauthorized".to_string(),
                upstream_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 30,
                run_migrations: true,
            },
            api: ApiConfig {
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 8080 },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                require_https: true,
                verify_user_on_api: true,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            gateway: GatewayConfig {
                upstream_url: "http://127.0.0.1:3000".to_string(),
                login_path: "/login".to_string(),
                unauthorized_path: "/unauthorized".to_string(),
                upstream_timeout_secs: 15,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 10,
                run_migrations: true,
            },
            api: ApiConfig {
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 8080 },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 8,
                require_https: true,
                verify_user_on_api: true,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            gateway: GatewayConfig {
                upstream_url: "http://127.0.0.1:3000".to_string(),
                login_path: "/login".to_string(),
                unauthorized_path: "/unauthorized".to_string(),
                upstream_timeout_secs: 10,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 5,
                run_migrations: false,
            },
            api: ApiConfig {
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.gateway.login_path, "/login");
        assert_eq!(config.gateway.unauthorized_path, "/unauthorized");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_production_config_requires_secret() {
        let config = AppConfig::production();
        assert!(config.security.require_https);
        assert!(!config.database.run_migrations);
        assert_eq!(config.validate(), Err(ConfigError::MissingSecret));
    }

    #[test]
    fn test_validate_rejects_bad_upstream() {
        let mut config = AppConfig::development();
        config.gateway.upstream_url = "not a url".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidUpstream("not a url".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_relative_redirects() {
        let mut config = AppConfig::development();
        config.gateway.unauthorized_path = "unauthorized".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidGatewayPath(_))));
    }

    #[test]
    fn test_validate_rejects_wildcard_cors_origin() {
        let mut config = AppConfig::development();
        config.security.cors_origins = vec!["https://app.example.com".to_string(), " * ".to_string()];
        assert_eq!(config.validate(), Err(ConfigError::WildcardCorsOrigin));

        config.security.enable_cors = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialized_config_hides_secrets() {
        let mut config = AppConfig::development();
        config.database.url = Some("postgres://u:p@localhost/condo".to_string());
        let value = serde_json::to_value(&config).unwrap();
        assert!(value["security"].get("jwt_secret").is_none());
        assert!(value["database"].get("url").is_none());
    }
}
