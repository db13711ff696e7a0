//! Decoding types
//!
//! Defines the payload kinds an endpoint can declare and the decoded values
//! the parser produces from response bodies.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Cursor value that denotes "no further page", by service convention.
pub const NO_MORE_PAGES: &str = "0";

// ============================================================================
// Payload Kind
// ============================================================================

/// The declared shape of an endpoint's response payload.
///
/// Selects how the parser decodes the body, together with the descriptor's
/// `payload_list` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// A named domain model (e.g. "status", "user"); the parser decodes one
    /// object or, when the descriptor is list-valued, an ordered sequence.
    Model(&'static str),
    /// Raw opaque JSON, returned as-is.
    Json,
    /// An envelope wrapping numeric identifiers plus pagination cursors.
    Ids,
}

// ============================================================================
// Ids Envelope
// ============================================================================

/// Envelope for id-list endpoints: a page of numeric identifiers plus the
/// next/previous pagination cursors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdsEnvelope {
    /// The identifiers on this page
    pub ids: Vec<u64>,
    /// Cursor for the next page ("0" = no further page)
    #[serde(default = "default_cursor", deserialize_with = "cursor_token")]
    pub next_cursor: String,
    /// Cursor for the previous page
    #[serde(default = "default_cursor", deserialize_with = "cursor_token")]
    pub previous_cursor: String,
}

fn default_cursor() -> String {
    NO_MORE_PAGES.to_string()
}

/// Cursors arrive as strings or as bare numbers depending on the endpoint
fn cursor_token<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected cursor string or number, got {other}"
        ))),
    }
}

// ============================================================================
// Decoded Result
// ============================================================================

/// A decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A single domain object
    Single(Value),
    /// An ordered sequence of domain objects
    List(Vec<Value>),
    /// A raw opaque JSON value
    Raw(Value),
    /// An ids envelope with pagination cursors
    Ids(IdsEnvelope),
}

impl Decoded {
    /// The next-page cursor carried by this value, if any.
    ///
    /// Ids envelopes carry cursors directly; object bodies may carry a
    /// `next_cursor` (numeric) or `next_cursor_str` (string) field.
    pub fn next_cursor(&self) -> Option<String> {
        match self {
            Decoded::Ids(envelope) => Some(envelope.next_cursor.clone()),
            Decoded::Single(value) | Decoded::Raw(value) => cursor_field(value),
            Decoded::List(_) => None,
        }
    }

    /// Number of items in this value (1 for single/raw payloads)
    pub fn len(&self) -> usize {
        match self {
            Decoded::Single(_) | Decoded::Raw(_) => 1,
            Decoded::List(items) => items.len(),
            Decoded::Ids(envelope) => envelope.ids.len(),
        }
    }

    /// Whether this value carries no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extract a cursor field from an object body, preferring the string form
fn cursor_field(value: &Value) -> Option<String> {
    if let Some(cursor) = value.get("next_cursor_str").and_then(Value::as_str) {
        return Some(cursor.to_string());
    }
    match value.get("next_cursor")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
