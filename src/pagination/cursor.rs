//! Cursor-paginated page sequences

use crate::binder::Binder;
use crate::decode::{Decoded, NO_MORE_PAGES};
use crate::descriptor::EndpointDescriptor;
use crate::error::{Error, Result};
use crate::request::CallArgs;
use futures::stream::{self, Stream};

/// Cursor token for the first page, by service convention
pub const START_CURSOR: &str = "-1";

/// A lazy, forward-only sequence of pages from a cursor-paginated endpoint.
///
/// The caller may stop pulling at any time. A failed pull ends the sequence;
/// pagination is not resumed past an error.
pub struct CursorPages<'a> {
    binder: &'a Binder,
    descriptor: &'a EndpointDescriptor,
    args: CallArgs,
    cursor: String,
    done: bool,
}

impl<'a> CursorPages<'a> {
    /// Start a page sequence over the given endpoint.
    ///
    /// The initial cursor is taken from a `cursor` argument when present,
    /// otherwise the start token. The endpoint must declare cursor support.
    pub fn new(
        binder: &'a Binder,
        descriptor: &'a EndpointDescriptor,
        args: CallArgs,
    ) -> Result<Self> {
        if !descriptor.supports_cursor {
            return Err(Error::validation(format!(
                "endpoint '{}' does not support cursor pagination",
                descriptor.name
            )));
        }
        let cursor = args
            .get("cursor")
            .map_or_else(|| START_CURSOR.to_string(), |v| v.render());
        Ok(Self {
            binder,
            descriptor,
            args,
            cursor,
            done: false,
        })
    }

    /// Override the starting cursor
    #[must_use]
    pub fn starting_at(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = cursor.into();
        self
    }

    /// The cursor the next pull will use
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// Pull the next page, or `None` when the sequence is exhausted
    pub async fn next_page(&mut self) -> Option<Result<Decoded>> {
        if self.done {
            return None;
        }

        let mut args = self.args.clone();
        args.set_cursor(self.cursor.clone());

        match self.binder.execute(self.descriptor, &args).await {
            Ok(page) => {
                match page.next_cursor() {
                    Some(next) if next != NO_MORE_PAGES => self.cursor = next,
                    _ => self.done = true,
                }
                Some(Ok(page))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }

    /// Adapt the sequence into a [`Stream`] of pages
    pub fn into_stream(self) -> impl Stream<Item = Result<Decoded>> + 'a {
        stream::unfold(self, |mut pages| async move {
            pages.next_page().await.map(|item| (item, pages))
        })
    }
}

impl std::fmt::Debug for CursorPages<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorPages")
            .field("endpoint", &self.descriptor.name)
            .field("cursor", &self.cursor)
            .field("done", &self.done)
            .finish()
    }
}
