//! Credential Supplier Boundary
//!
//! The identity provider is an external collaborator. This crate only asks it
//! for a token per call; any caching belongs to the provider.

use async_trait::async_trait;

/// Supplies short-lived bearer tokens for a named template
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// `Ok(None)` means "no session"; `Err` means acquisition itself failed
    async fn get_token(&self, template: &str) -> Result<Option<String>, String>;
}

/// Fixed token (or none), e.g. from an environment variable
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// Empty strings count as no token
    pub fn from_env(var: &str) -> Self {
        Self {
            token: std::env::var(var).ok().filter(|t| !t.trim().is_empty()),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self, _template: &str) -> Result<Option<String>, String> {
        Ok(self.token.clone())
    }
}
