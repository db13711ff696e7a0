//! Authenticator trait and static-credential implementation

use super::types::{AuthConfig, Location};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::RequestBuilder;

/// Signs outgoing requests.
///
/// A signing failure is fatal for the attempt that triggered it: the binder
/// surfaces it as an auth error and never retries it.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Return the request with credentials applied
    async fn sign(&self, req: RequestBuilder) -> Result<RequestBuilder>;

    /// The identity the credentials belong to (e.g. an account handle)
    async fn current_identity(&self) -> Result<String>;
}

/// Authenticator over static credentials
#[derive(Debug, Clone)]
pub struct StaticAuth {
    config: AuthConfig,
    identity: Option<String>,
}

impl StaticAuth {
    /// Create a static authenticator from the given config
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            identity: None,
        }
    }

    /// Record the identity these credentials belong to
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }
}

#[async_trait]
impl Authenticator for StaticAuth {
    async fn sign(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Ok(req),

            AuthConfig::ApiKey {
                location,
                header_name,
                query_param,
                prefix,
                value,
            } => {
                let val = format!("{}{}", prefix.as_deref().unwrap_or(""), value);
                match location {
                    Location::Header => {
                        let header = header_name.as_deref().unwrap_or("Authorization");
                        Ok(req.header(header, val))
                    }
                    Location::Query => {
                        let param = query_param.as_deref().unwrap_or("api_key");
                        Ok(req.query(&[(param, val)]))
                    }
                }
            }

            AuthConfig::Basic { username, password } => {
                Ok(req.basic_auth(username, Some(password)))
            }

            AuthConfig::Bearer { token } => Ok(req.bearer_auth(token)),

            AuthConfig::CustomHeaders { headers } => {
                let mut req = req;
                for (key, value) in headers {
                    req = req.header(key.as_str(), value.as_str());
                }
                Ok(req)
            }
        }
    }

    async fn current_identity(&self) -> Result<String> {
        self.identity
            .clone()
            .ok_or_else(|| Error::auth("no identity recorded for these credentials"))
    }
}
