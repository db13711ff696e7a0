//! Authentication
//!
//! The [`Authenticator`] trait is the seam between the binder and credential
//! handling: given a prepared request builder it returns the signed builder,
//! or reports that it cannot authenticate. [`StaticAuth`] covers the common
//! static-credential schemes; token-refresh flows live behind the same trait
//! in downstream crates.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, StaticAuth};
pub use types::{AuthConfig, Location};
