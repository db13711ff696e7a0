//! Response decoding
//!
//! The binder hands successful response bodies to a [`Parser`], which turns
//! them into [`Decoded`] values according to the payload kind declared on the
//! endpoint descriptor. A JSON parser is provided; alternative parsers can be
//! plugged in for services with different envelope conventions.

mod parser;
mod types;

pub use parser::{JsonParser, Parser};
pub use types::{Decoded, IdsEnvelope, PayloadKind, NO_MORE_PAGES};
