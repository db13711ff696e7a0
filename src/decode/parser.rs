//! Parser implementations
//!
//! The [`Parser`] trait is the seam between the binder and response decoding.
//! [`JsonParser`] is the stock implementation for JSON services.

use super::types::{Decoded, IdsEnvelope, PayloadKind};
use crate::error::{Error, Result};
use serde_json::Value;

/// Decodes a raw response body into a domain value.
///
/// Implementations must be cheap to share: one parser instance serves every
/// call made through a binder.
pub trait Parser: Send + Sync {
    /// Decode `body` according to the declared payload kind.
    ///
    /// `is_list` selects sequence decoding for model payloads; it is ignored
    /// for raw JSON and ids envelopes.
    fn decode(&self, body: &str, kind: PayloadKind, is_list: bool) -> Result<Decoded>;
}

/// Stock JSON parser
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Create a new JSON parser
    pub fn new() -> Self {
        Self
    }
}

/// Plural envelope key for a model name ("status" -> "statuses", "user" ->
/// "users")
fn plural(model: &str) -> String {
    if model.ends_with('s') {
        format!("{model}es")
    } else {
        format!("{model}s")
    }
}

impl Parser for JsonParser {
    fn decode(&self, body: &str, kind: PayloadKind, is_list: bool) -> Result<Decoded> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("malformed JSON body: {e}")))?;

        match kind {
            PayloadKind::Json => Ok(Decoded::Raw(value)),

            PayloadKind::Ids => {
                let envelope: IdsEnvelope = serde_json::from_value(value)
                    .map_err(|e| Error::decode(format!("malformed ids envelope: {e}")))?;
                Ok(Decoded::Ids(envelope))
            }

            PayloadKind::Model(model) => {
                if is_list {
                    match value {
                        Value::Array(items) => Ok(Decoded::List(items)),
                        // Some list endpoints wrap their items in an envelope
                        // keyed by the model name or a well-known field.
                        Value::Object(ref map) => {
                            let items = map
                                .get(model)
                                .or_else(|| map.get("results"))
                                .or_else(|| map.get(&plural(model)))
                                .and_then(Value::as_array);
                            match items {
                                Some(items) => Ok(Decoded::List(items.clone())),
                                None => Err(Error::decode(format!(
                                    "expected a list of '{model}' objects, got an object \
                                     with no recognizable items field"
                                ))),
                            }
                        }
                        other => Err(Error::decode(format!(
                            "expected a list of '{model}' objects, got {other}"
                        ))),
                    }
                } else {
                    match value {
                        Value::Object(_) => Ok(Decoded::Single(value)),
                        other => Err(Error::decode(format!(
                            "expected a '{model}' object, got {other}"
                        ))),
                    }
                }
            }
        }
    }
}
