//! Call arguments
//!
//! [`CallArgs`] is the ordered, per-invocation mapping from parameter name to
//! value. It is owned by the call that created it and never shared across
//! calls; the binder re-reads it to rebuild the request for every attempt.

use crate::descriptor::EndpointDescriptor;
use crate::error::{Error, Result};
use crate::types::ParamValue;
use bytes::Bytes;

/// A file payload attached to an upload call
#[derive(Debug, Clone)]
pub struct MediaPayload {
    /// Source filename; its extension determines the MIME type
    pub filename: String,
    /// Raw file bytes
    pub bytes: Bytes,
}

/// Ordered per-call arguments
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    params: Vec<(String, ParamValue)>,
    media: Option<MediaPayload>,
}

impl CallArgs {
    /// Create an empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument (builder style)
    #[must_use]
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Set an argument, replacing any existing value for the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        if let Some(slot) = self.params.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value.into();
        } else {
            self.params.push((name, value.into()));
        }
    }

    /// Set the pagination cursor argument
    pub fn set_cursor(&mut self, cursor: impl Into<String>) {
        self.set("cursor", cursor.into());
    }

    /// Attach a file payload (builder style)
    #[must_use]
    pub fn media(mut self, filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        self.media = Some(MediaPayload {
            filename: filename.into(),
            bytes: bytes.into(),
        });
        self
    }

    /// Look up an argument by name
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// The attached file payload, if any
    pub fn media_payload(&self) -> Option<&MediaPayload> {
        self.media.as_ref()
    }

    /// Iterate over arguments in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Whether no arguments were supplied
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Canonical representation used for cache keys: name=value pairs in
    /// sorted order, so argument ordering does not fragment the cache.
    pub fn canonical(&self) -> String {
        let mut pairs: Vec<String> = self
            .params
            .iter()
            .map(|(n, v)| format!("{n}={}", v.render()))
            .collect();
        pairs.sort();
        pairs.join("&")
    }

    /// Reject any argument name outside the descriptor's closed parameter set
    pub fn validate(&self, descriptor: &EndpointDescriptor) -> Result<()> {
        for (name, _) in &self.params {
            if !descriptor.accepts(name) {
                return Err(Error::unknown_argument(descriptor.name, name));
            }
        }
        Ok(())
    }
}
