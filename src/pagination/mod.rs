//! Cursor pagination
//!
//! Presents a cursor-paginated endpoint as a single logical lazy sequence of
//! pages. Each page pull is one binder call; traversal is forward-only and
//! non-restartable, and stops at the service's "no further page" sentinel or
//! whenever the consumer stops pulling. Cursors are stateless tokens, so
//! abandoning a traversal needs no cleanup.

mod cursor;

pub use cursor::{CursorPages, START_CURSOR};
