//! The binder: the generic request-invocation engine
//!
//! Every endpoint declaration delegates here. [`Binder::execute`] takes an
//! endpoint descriptor plus call-time arguments and produces a decoded result
//! or a typed error, performing argument validation, request construction,
//! auth injection, cache consultation, network dispatch, retry/backoff,
//! rate-limit cooperation, and response decoding.
//!
//! A logical call runs its attempts to completion before returning. The only
//! state shared across concurrent calls is the rate-limit tracker and the
//! cache; retry sleeps suspend the calling task only.

mod config;

pub use config::{BinderConfig, BinderConfigBuilder};

use crate::auth::Authenticator;
use crate::cache::{cache_key, Cache};
use crate::decode::{Decoded, JsonParser, Parser};
use crate::descriptor::EndpointDescriptor;
use crate::error::{Error, Result};
use crate::rate_limit::RateLimitTracker;
use crate::request::{CallArgs, PreparedRequest};
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(test)]
mod tests;

/// The request-invocation engine
pub struct Binder {
    client: Client,
    config: BinderConfig,
    authenticator: Option<Arc<dyn Authenticator>>,
    cache: Option<Arc<dyn Cache>>,
    parser: Arc<dyn Parser>,
    rate_limits: Arc<RateLimitTracker>,
}

impl Binder {
    /// Create a binder with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(BinderConfig::default())
    }

    /// Create a binder with the given configuration
    pub fn with_config(config: BinderConfig) -> Result<Self> {
        if let Some(host) = &config.host {
            url::Url::parse(host)?;
        }

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .gzip(config.compression);
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| Error::config(format!("invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            authenticator: None,
            cache: None,
            parser: Arc::new(JsonParser::new()),
            rate_limits: Arc::new(RateLimitTracker::new()),
        })
    }

    /// Attach an authenticator
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Attach a response cache
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the response parser
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    /// The shared rate limit tracker
    pub fn rate_limits(&self) -> &RateLimitTracker {
        &self.rate_limits
    }

    /// The binder configuration
    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Execute one logical call: validate, consult the cache, dispatch with
    /// retries, decode, and store.
    pub async fn execute(
        &self,
        descriptor: &EndpointDescriptor,
        args: &CallArgs,
    ) -> Result<Decoded> {
        args.validate(descriptor)?;

        if descriptor.require_auth && self.authenticator.is_none() {
            return Err(Error::auth(format!(
                "endpoint '{}' requires authentication but no authenticator is configured",
                descriptor.name
            )));
        }

        let key = (descriptor.cacheable() && self.cache.is_some())
            .then(|| cache_key(descriptor, args));
        if let (Some(key), Some(cache)) = (&key, &self.cache) {
            if let Some(hit) = cache.get(key).await {
                debug!(endpoint = descriptor.name, "cache hit");
                return Ok(hit);
            }
        }

        let decoded = self.invoke(descriptor, args).await?;

        if let (Some(key), Some(cache)) = (&key, &self.cache) {
            cache.put(key, decoded.clone()).await;
        }
        Ok(decoded)
    }

    /// Execute a credential-verification style call, downgrading an HTTP 401
    /// to `Ok(None)` ("not authenticated") instead of an error. Every other
    /// outcome behaves exactly as [`Binder::execute`].
    pub async fn verify(
        &self,
        descriptor: &EndpointDescriptor,
        args: &CallArgs,
    ) -> Result<Option<Decoded>> {
        match self.execute(descriptor, args).await {
            Ok(decoded) => Ok(Some(decoded)),
            Err(Error::Unauthorized { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// The retry loop: Attempting -> {Success, Retrying, Failed}
    async fn invoke(&self, descriptor: &EndpointDescriptor, args: &CallArgs) -> Result<Decoded> {
        // Advisory gate from previous calls' observations: if the family is
        // known to be exhausted, wait out the window before the first attempt.
        if self.config.wait_on_rate_limit {
            let wait = self.rate_limits.wait_duration(
                descriptor.name,
                self.config.rate_limit_margin,
                Utc::now().timestamp(),
            );
            if let Some(wait) = wait {
                self.notify_rate_limit_wait(descriptor.name, wait);
                tokio::time::sleep(wait).await;
            }
        }

        let max_attempts = self.config.retry_count + 1;
        let mut attempts_used = 0u32;

        loop {
            attempts_used += 1;
            let err = match self.attempt(descriptor, args).await {
                Ok(decoded) => return Ok(decoded),
                Err(err) => err,
            };

            // Rate-limit waits are driven by the server's reset schedule and
            // do not count against the ordinary retry budget.
            if self.config.wait_on_rate_limit {
                if let Error::RateLimited { reset_at } = err {
                    let until_reset = (reset_at - Utc::now().timestamp()).max(0);
                    let wait =
                        Duration::from_secs(until_reset as u64) + self.config.rate_limit_margin;
                    self.notify_rate_limit_wait(descriptor.name, wait);
                    tokio::time::sleep(wait).await;
                    attempts_used -= 1;
                    continue;
                }
            }

            if !self.should_retry(&err) || attempts_used >= max_attempts {
                return Err(err);
            }

            warn!(
                endpoint = descriptor.name,
                attempt = attempts_used,
                max_attempts,
                error = %err,
                delay_ms = self.config.retry_delay.as_millis() as u64,
                "attempt failed, retrying"
            );
            tokio::time::sleep(self.config.retry_delay).await;
        }
    }

    /// One attempt: build, sign, dispatch, classify, decode.
    ///
    /// The prepared request is rebuilt from the original arguments on every
    /// call, so placeholder substitution re-runs rather than reusing a stale
    /// rendering.
    async fn attempt(&self, descriptor: &EndpointDescriptor, args: &CallArgs) -> Result<Decoded> {
        let prepared = PreparedRequest::build(descriptor, args)?;
        let url = self.build_url(&prepared.path);

        let mut req = self
            .client
            .request(descriptor.method.into(), &url)
            .timeout(self.config.timeout);
        for (key, value) in &prepared.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if !prepared.query.is_empty() {
            req = req.query(&prepared.query);
        }
        if let Some(body) = &prepared.body {
            req = req.body(body.clone());
        } else if !prepared.form.is_empty() {
            req = req.form(&prepared.form);
        }

        if descriptor.require_auth {
            if let Some(auth) = &self.authenticator {
                req = auth.sign(req).await?;
            }
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Err(Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                })
            }
            Err(e) => return Err(Error::Transport(e)),
        };

        let status = response.status().as_u16();
        self.rate_limits
            .observe_headers(descriptor.name, response.headers());

        if response.status().is_success() {
            let body = response.text().await.map_err(Error::Transport)?;
            debug!(endpoint = descriptor.name, status, "request succeeded");
            return self
                .parser
                .decode(&body, descriptor.payload, descriptor.payload_list);
        }

        let body = response.text().await.unwrap_or_default();
        Err(self.classify(descriptor, status, body))
    }

    /// Map a non-success status code to the error taxonomy
    fn classify(&self, descriptor: &EndpointDescriptor, status: u16, body: String) -> Error {
        match status {
            401 => Error::Unauthorized { body },
            429 => {
                // Record exhaustion even when the response carried no rate
                // limit headers, so the advisory gate sees it.
                let reset_at = self
                    .rate_limits
                    .snapshot(descriptor.name)
                    .reset_at
                    .unwrap_or_else(|| Utc::now().timestamp());
                self.rate_limits
                    .observe(descriptor.name, Some(0), Some(reset_at));
                Error::RateLimited { reset_at }
            }
            500..=599 => Error::server(status, body),
            _ => Error::client(status, body),
        }
    }

    /// Whether an error is retryable under the configured policy
    fn should_retry(&self, err: &Error) -> bool {
        match err {
            Error::Transport(_) | Error::Timeout { .. } | Error::RateLimited { .. } => true,
            Error::Server { status, .. } => self.config.retry_errors.contains(status),
            Error::Client { status, .. } => self.config.retry_errors.contains(status),
            _ => false,
        }
    }

    fn notify_rate_limit_wait(&self, endpoint: &str, wait: Duration) {
        if self.config.wait_on_rate_limit_notify {
            warn!(
                endpoint,
                wait_secs = wait.as_secs(),
                "rate limit reached, waiting for window reset"
            );
        } else {
            debug!(
                endpoint,
                wait_secs = wait.as_secs(),
                "rate limit reached, waiting for window reset"
            );
        }
    }

    /// Build the full URL from the configured host, API root, and path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match &self.config.host {
            Some(host) => {
                let host = host.trim_end_matches('/');
                format!("{host}{}{path}", self.config.api_root)
            }
            None => path.to_string(),
        }
    }
}

impl std::fmt::Debug for Binder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("config", &self.config)
            .field("has_authenticator", &self.authenticator.is_some())
            .field("has_cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}
