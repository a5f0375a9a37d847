//! Cursor-following traversal of Bitbucket's paginated listings.
//!
//! Bitbucket wraps list responses in an envelope whose `next` field is the
//! absolute URL of the following page. [`PaginatedRequest`] walks that chain
//! one page at a time, only fetching when a caller asks for more.
//!
//! # Example
//!
//! ```no_run
//! use bitbucket_pr_comment::bitbucket::{ApiBase, BitbucketClient, Credentials, RequestOptions};
//!
//! # async fn run() -> Result<(), bitbucket_pr_comment::PipeError> {
//! let credentials = Credentials::new("user", "app-password")?;
//! let client = BitbucketClient::new(credentials, ApiBase::default());
//! let mut comments = client.paginate::<serde_json::Value>(
//!     "repositories/team/repo/pullrequests/1/comments",
//!     RequestOptions::new(),
//! );
//! while let Some(comment) = comments.next_item().await? {
//!     println!("{comment}");
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;

use futures::Stream;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::client::BitbucketClient;
use super::error::PipeError;
use super::request::{RequestOptions, RequestTarget};
use super::transport::HttpTransport;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageEnvelope<Item> {
    /// Items on this page, in server order.
    pub values: Vec<Item>,
    /// Total number of items across all pages, when reported.
    pub size: Option<u64>,
    /// 1-based page number, when reported.
    pub page: Option<u64>,
    /// Requested page length.
    pub pagelen: Option<u64>,
    /// Absolute URL of the next page; absent or empty on the last page.
    pub next: Option<String>,
    /// Absolute URL of the previous page. Not used for traversal.
    pub prev: Option<String>,
}

#[derive(Debug)]
enum Cursor {
    Start(RequestTarget),
    Next(String),
}

impl Cursor {
    fn into_target(self) -> Result<RequestTarget, PipeError> {
        match self {
            Self::Start(target) => Ok(target),
            Self::Next(cursor) => match Url::parse(&cursor) {
                Ok(url) => Ok(RequestTarget::Absolute(url)),
                Err(_) => Err(PipeError::InvalidCursor { cursor }),
            },
        }
    }
}

/// Lazy, forward-only traversal over every item of a paginated listing.
///
/// The traversal is single-use: once exhausted, or once a page fetch fails,
/// it yields nothing further. Create a new one to start over.
#[derive(Debug)]
pub struct PaginatedRequest<'client, Item, Transport> {
    client: &'client BitbucketClient<Transport>,
    options: RequestOptions,
    cursor: Option<Cursor>,
    buffer: VecDeque<Item>,
}

impl<'client, Item, Transport> PaginatedRequest<'client, Item, Transport>
where
    Item: DeserializeOwned,
    Transport: HttpTransport,
{
    pub(crate) const fn new(
        client: &'client BitbucketClient<Transport>,
        start: RequestTarget,
        options: RequestOptions,
    ) -> Self {
        Self {
            client,
            options,
            cursor: Some(Cursor::Start(start)),
            buffer: VecDeque::new(),
        }
    }

    /// Returns true once every page has been fetched and every item taken.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_none() && self.buffer.is_empty()
    }

    /// Returns the next batch of items.
    ///
    /// Items already buffered by [`Self::next_item`] are returned first;
    /// otherwise exactly one page is fetched. `Ok(None)` means the listing is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Propagates any failure from the request executor, or
    /// [`PipeError::InvalidCursor`] when the server's `next` link is not an
    /// absolute URL. The traversal is finished after an error.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Item>>, PipeError> {
        if !self.buffer.is_empty() {
            return Ok(Some(self.buffer.drain(..).collect()));
        }
        self.fetch_page().await
    }

    /// Returns the next item, fetching a new page only when the current one
    /// has been fully consumed.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_page`].
    pub async fn next_item(&mut self) -> Result<Option<Item>, PipeError> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            match self.fetch_page().await? {
                Some(values) => self.buffer.extend(values),
                None => return Ok(None),
            }
        }
    }

    /// Adapts the traversal into a [`Stream`] of items.
    ///
    /// The stream yields the first error it meets and then ends.
    pub fn into_stream(self) -> impl Stream<Item = Result<Item, PipeError>> + 'client
    where
        Item: 'client,
    {
        futures::stream::try_unfold(self, |mut pages| async move {
            let next = pages.next_item().await?;
            Ok(next.map(|item| (item, pages)))
        })
    }

    async fn fetch_page(&mut self) -> Result<Option<Vec<Item>>, PipeError> {
        let Some(cursor) = self.cursor.take() else {
            return Ok(None);
        };
        let target = cursor.into_target()?;

        let envelope: PageEnvelope<Item> = self.client.request(target, &self.options).await?;
        tracing::debug!(
            "received page {:?} with {} items (more: {})",
            envelope.page,
            envelope.values.len(),
            envelope.next.is_some()
        );

        self.cursor = envelope
            .next
            .filter(|cursor| !cursor.is_empty())
            .map(Cursor::Next);
        Ok(Some(envelope.values))
    }
}
