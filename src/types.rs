//! Common types used throughout restbind
//!
//! Shared type definitions used across multiple modules: the HTTP method
//! subset the engine dispatches, and the loosely-typed parameter values
//! accepted at call time.

use serde::{Deserialize, Serialize};

// ============================================================================
// HTTP Method
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
}

impl Method {
    /// Read-style methods carry their arguments in the query string;
    /// write-style methods carry them as form body fields.
    pub fn is_read(self) -> bool {
        matches!(self, Method::GET | Method::DELETE)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

// ============================================================================
// Parameter Values
// ============================================================================

/// A loosely-typed call argument value.
///
/// Everything is rendered to a string before transmission. `List` values are
/// flattened to a comma-joined string in original order, the convention
/// bulk-lookup endpoints rely on.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl ParamValue {
    /// Render the value as it will appear on the wire
    pub fn render(&self) -> String {
        match self {
            ParamValue::Str(s) => s.clone(),
            ParamValue::Int(i) => i.to_string(),
            ParamValue::UInt(u) => u.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::List(items) => items.join(","),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::UInt(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::UInt(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        ParamValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<u64>> for ParamValue {
    fn from(value: Vec<u64>) -> Self {
        ParamValue::List(value.into_iter().map(|v| v.to_string()).collect())
    }
}
