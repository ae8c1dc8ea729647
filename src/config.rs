//! Client Configuration
//!
//! Stored as JSON next to the app data (e.g. `wish_sync.json`) and overridable
//! from the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_TOKEN_TEMPLATE: &str = "backend-taine";

pub const ENV_API_URL: &str = "WISH_API_URL";
pub const ENV_TOKEN_TEMPLATE: &str = "WISH_TOKEN_TEMPLATE";
pub const ENV_ORGANIZATION_ID: &str = "WISH_ORGANIZATION_ID";

/// Which route accepts creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreateRoute {
    /// POST /wishes
    #[default]
    Wishes,
    /// POST /wish
    Wish,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(String),
    #[error("Config parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base: String,
    pub token_template: String,
    pub create_route: CreateRoute,
    pub request_timeout_secs: Option<u64>,
    pub organization_id: Option<String>,
    /// List/get proceed without a token when none is available
    pub allow_anonymous_reads: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token_template: DEFAULT_TOKEN_TEMPLATE.to_string(),
            create_route: CreateRoute::default(),
            request_timeout_secs: None,
            organization_id: None,
            allow_anonymous_reads: false,
        }
    }
}

impl ClientConfig {
    /// Load from a JSON file. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        Ok(Some(config))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))
    }

    /// Apply `WISH_API_URL`, `WISH_TOKEN_TEMPLATE`, `WISH_ORGANIZATION_ID`
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base = url;
        }
        if let Some(template) = lookup(ENV_TOKEN_TEMPLATE) {
            self.token_template = template;
        }
        if let Some(org) = lookup(ENV_ORGANIZATION_ID) {
            self.organization_id = Some(org);
        }
        self
    }

    /// API base without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
