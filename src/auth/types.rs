//! Authentication configuration types

use std::collections::HashMap;

/// Where an API key is placed on the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    /// In a request header
    #[default]
    Header,
    /// In the query string
    Query,
}

/// Static credential configuration
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// No authentication
    None,

    /// API key in a header or query parameter
    ApiKey {
        /// Where to place the key
        location: Location,
        /// Header name (default: "Authorization")
        header_name: Option<String>,
        /// Query parameter name (default: "api_key")
        query_param: Option<String>,
        /// Optional value prefix (e.g. "Token ")
        prefix: Option<String>,
        /// The key value
        value: String,
    },

    /// HTTP basic auth
    Basic {
        username: String,
        password: String,
    },

    /// Bearer token
    Bearer {
        token: String,
    },

    /// Arbitrary static headers
    CustomHeaders {
        headers: HashMap<String, String>,
    },
}

impl AuthConfig {
    /// Bearer token config
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// API key in a named header
    pub fn api_key_header(header: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ApiKey {
            location: Location::Header,
            header_name: Some(header.into()),
            query_param: None,
            prefix: None,
            value: value.into(),
        }
    }

    /// API key in a query parameter
    pub fn api_key_query(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ApiKey {
            location: Location::Query,
            header_name: None,
            query_param: Some(param.into()),
            prefix: None,
            value: value.into(),
        }
    }

    /// HTTP basic auth config
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }
}
