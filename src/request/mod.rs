//! Request construction and validation
//!
//! Turns an endpoint descriptor plus per-call arguments into a concrete,
//! ready-to-send request: path placeholders substituted, remaining arguments
//! partitioned into query string or form body, uploads validated and packed
//! into a multipart body. Everything here runs before any network I/O, so
//! invalid calls fail without touching the wire.

mod args;
mod prepared;

pub use args::{CallArgs, MediaPayload};
pub use prepared::{guess_mime_type, PreparedRequest, MULTIPART_BOUNDARY};
