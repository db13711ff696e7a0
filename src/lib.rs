//! # restbind
//!
//! Declarative REST endpoint binding: turn a static description of an
//! endpoint (path template, method, accepted parameters, auth requirement,
//! payload shape, pagination/caching flags) into an executed HTTP call with
//! response decoding, retrying, rate-limit cooperation, and optional caching.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restbind::{
//!     Binder, BinderConfig, CallArgs, EndpointDescriptor, PayloadKind, Result,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let binder = Binder::with_config(
//!         BinderConfig::builder()
//!             .host("https://api.example.com")
//!             .api_root("/1.1")
//!             .retry_count(3)
//!             .build(),
//!     )?;
//!
//!     let user_timeline = EndpointDescriptor::builder(
//!         "user_timeline",
//!         "/statuses/user_timeline.json",
//!     )
//!     .allowed_params(&["user_id", "count", "since_id"])
//!     .payload(PayloadKind::Model("status"))
//!     .payload_list()
//!     .build();
//!
//!     let page = binder
//!         .execute(&user_timeline, &CallArgs::new().arg("user_id", 12u64))
//!         .await?;
//!     println!("{} items", page.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                         Binder                             │
//! │  execute(descriptor, args) → Decoded | Error               │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────┬───────────┬─────┴─────┬────────────┬────────────┐
//! │ Request  │   Auth    │ RateLimit │   Decode   │ Pagination │
//! ├──────────┼───────────┼───────────┼────────────┼────────────┤
//! │ Validate │ Sign      │ Observe   │ Model/List │ Cursor     │
//! │ Path sub │ Identity  │ Wait      │ Ids/Raw    │ Stream     │
//! │ Multipart│           │ Retry     │            │            │
//! └──────────┴───────────┴───────────┴────────────┴────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error taxonomy
pub mod error;

/// Common types and parameter values
pub mod types;

/// Endpoint descriptors
pub mod descriptor;

/// Request construction and validation
pub mod request;

/// Authentication
pub mod auth;

/// Response caching
pub mod cache;

/// Response decoding
pub mod decode;

/// Server-observed rate limit state
pub mod rate_limit;

/// The request-invocation engine
pub mod binder;

/// Cursor pagination
pub mod pagination;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{AuthConfig, Authenticator, StaticAuth};
pub use binder::{Binder, BinderConfig};
pub use cache::{Cache, MemoryCache};
pub use decode::{Decoded, IdsEnvelope, JsonParser, Parser, PayloadKind};
pub use descriptor::{EndpointDescriptor, UploadSpec};
pub use error::{Error, Result};
pub use pagination::CursorPages;
pub use rate_limit::RateLimitTracker;
pub use request::CallArgs;
pub use types::{Method, ParamValue};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
