//! Authenticated Request Issuer
//!
//! Every call asks the token provider for a fresh token; nothing is cached
//! here. Whether a missing token is fatal is declared per request.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::payload::decode_json;
use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::domain::{SyncError, SyncResult};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method};

/// What to do when no token can be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    /// Fail fast with `SyncError::Auth`
    Required,
    /// Send the request without `Authorization`
    Optional,
}

/// A logical API call before headers are attached
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub auth: AuthRequirement,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            auth: AuthRequirement::Required,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json(mut self, body: &impl Serialize) -> SyncResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| SyncError::InvalidInput(format!("unserializable body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn auth(mut self, auth: AuthRequirement) -> Self {
        self.auth = auth;
        self
    }
}

pub struct RequestIssuer {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
    template: String,
}

impl RequestIssuer {
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            transport,
            tokens,
            base_url: config.base_url().to_string(),
            template: config.token_template.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fresh token for this call, or the failure dictated by `auth`
    async fn authorization(&self, auth: AuthRequirement) -> SyncResult<Option<String>> {
        let reason = match self.tokens.get_token(&self.template).await {
            Ok(Some(token)) if !token.is_empty() => return Ok(Some(token)),
            Ok(_) => "no token available".to_string(),
            Err(e) => format!("token acquisition failed: {}", e),
        };

        match auth {
            AuthRequirement::Required => Err(SyncError::Auth(format!(
                "{} (template {})",
                reason, self.template
            ))),
            AuthRequirement::Optional => {
                warn!("Proceeding unauthenticated: {}", reason);
                Ok(None)
            }
        }
    }

    /// Send the request; non-2xx becomes `Request`, transport failure `Network`
    pub async fn issue(&self, request: ApiRequest) -> SyncResult<HttpResponse> {
        let token = self.authorization(request.auth).await?;

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        let url = format!("{}{}", self.base_url, request.path);
        debug!("{} {}", request.method, url);

        let response = self
            .transport
            .send(HttpRequest {
                method: request.method.clone(),
                url: url.clone(),
                headers,
                body: request.body.as_ref().map(Value::to_string),
            })
            .await
            .map_err(|e| {
                warn!("{} {} unreachable: {}", request.method, url, e);
                SyncError::network(e.0)
            })?;

        if !response.is_success() {
            warn!("{} {} -> {}: {}", request.method, url, response.status, response.body);
            return Err(SyncError::Request {
                status: response.status,
                body: response.body,
            });
        }

        Ok(response)
    }

    /// Send and decode the body as JSON
    pub async fn issue_json<T: DeserializeOwned>(&self, request: ApiRequest) -> SyncResult<T> {
        let response = self.issue(request).await?;
        decode_json(&response.body)
    }

    /// Send and ignore the (usually empty) body
    pub async fn issue_empty(&self, request: ApiRequest) -> SyncResult<()> {
        self.issue(request).await.map(|_| ())
    }
}
