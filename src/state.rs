use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::UserStore;

/// Shared handles available to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
    pub users: Arc<dyn UserStore>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig, users: Arc<dyn UserStore>) -> anyhow::Result<Self> {
        config.validate()?;
        let tokens = TokenService::from_config(&config)?;

        // Upstream redirects and encodings go back to the browser untouched
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.gateway.upstream_timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .no_gzip()
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            tokens,
            users,
            http,
        })
    }
}
