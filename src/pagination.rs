//! Cursor pagination over the `@pagination` block of a response.
//!
//! Paginated collections carry a reserved top-level `@pagination` object
//! with `first`/`next`/`last` sub-objects, each holding the `@href` of the
//! sibling page. The pager resolves a slot's href and issues a fresh GET
//! through the originating client; the returned response may itself be
//! paginated, so navigation chains.

use crate::client::TravisClient;
use crate::document::{Document, Item};
use crate::error::{Result, TravisError};
use crate::response::ApiResponse;

/// Reserved top-level key carrying the pagination links.
const PAGINATION_KEY: &str = "@pagination";

/// Navigates sibling pages of one paginated response.
///
/// Obtained from [`ApiResponse::pager`]. Each navigation returns a fresh
/// [`ApiResponse`]; the pager itself stays bound to the page it was built
/// from.
pub struct Pager {
    client: TravisClient,
    document: Document,
}

impl Pager {
    pub(crate) fn new(client: TravisClient, document: Document) -> Self {
        Self { client, document }
    }

    /// Returns true if the originating response carries a pagination block.
    pub fn is_paginated(&self) -> bool {
        self.document.get(PAGINATION_KEY).is_document()
    }

    /// Returns true if a next page exists.
    pub fn has_next(&self) -> bool {
        !self.href("next").is_absent()
    }

    /// Fetch the next page.
    ///
    /// # Errors
    ///
    /// [`TravisError::NoSuchPage`] when the response is not paginated or is
    /// already on the last page; no request is attempted in that case.
    pub async fn next(&self) -> Result<ApiResponse> {
        self.page("next").await
    }

    /// Fetch the first page.
    pub async fn first(&self) -> Result<ApiResponse> {
        self.page("first").await
    }

    /// Fetch the last page.
    pub async fn last(&self) -> Result<ApiResponse> {
        self.page("last").await
    }

    async fn page(&self, slot: &'static str) -> Result<ApiResponse> {
        let href = self.href(slot);
        match href.as_str() {
            Some(href) => self.client.get(href).await,
            None => Err(TravisError::NoSuchPage { slot }),
        }
    }

    fn href(&self, slot: &'static str) -> Item {
        self.document.dig([PAGINATION_KEY, slot, "@href"])
    }
}
