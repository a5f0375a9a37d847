//! Comment gateway backed by the Bitbucket REST client.

use async_trait::async_trait;
use http::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{PullRequestCommentGateway, PullRequestRef};
use crate::bitbucket::client::BitbucketClient;
use crate::bitbucket::error::PipeError;
use crate::bitbucket::request::RequestOptions;
use crate::bitbucket::transport::{HttpTransport, ReqwestTransport};

/// Partial model of a Bitbucket pull request comment.
///
/// Only the fields the pipe reads are modelled; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestComment {
    /// Comment id.
    pub id: u64,
    /// Whether the comment has been deleted.
    #[serde(default)]
    pub deleted: bool,
    /// Whether the comment is a pending (unsubmitted) review comment.
    #[serde(default)]
    pub pending: bool,
    /// Comment body in its different renderings.
    pub content: Option<CommentContent>,
    /// Creation timestamp as reported by Bitbucket.
    pub created_on: Option<String>,
    /// Last update timestamp as reported by Bitbucket.
    pub updated_on: Option<String>,
}

/// Body of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentContent {
    /// Source text as written.
    pub raw: Option<String>,
    /// Rendered HTML.
    pub html: Option<String>,
    /// Markup language of `raw` (`markdown`, `creole` or `plaintext`).
    pub markup: Option<String>,
}

impl PullRequestComment {
    /// Returns true when the comment is live and its raw text contains
    /// `marker`.
    #[must_use]
    pub fn carries_marker(&self, marker: &str) -> bool {
        !self.deleted
            && self
                .content
                .as_ref()
                .and_then(|content| content.raw.as_deref())
                .is_some_and(|raw| raw.contains(marker))
    }
}

/// [`PullRequestCommentGateway`] that talks to Bitbucket over HTTP.
#[derive(Debug, Clone)]
pub struct BitbucketCommentGateway<Transport = ReqwestTransport> {
    client: BitbucketClient<Transport>,
}

impl<Transport> BitbucketCommentGateway<Transport>
where
    Transport: HttpTransport,
{
    /// Wraps an authenticated client.
    #[must_use]
    pub const fn new(client: BitbucketClient<Transport>) -> Self {
        Self { client }
    }
}

fn comment_body(content: &str) -> String {
    json!({ "content": { "raw": content } }).to_string()
}

#[async_trait]
impl<Transport> PullRequestCommentGateway for BitbucketCommentGateway<Transport>
where
    Transport: HttpTransport,
{
    async fn find_comment(
        &self,
        pull_request: &PullRequestRef,
        marker: &str,
    ) -> Result<Option<u64>, PipeError> {
        let mut comments = self
            .client
            .paginate::<PullRequestComment>(pull_request.comments_path(), RequestOptions::new());

        while let Some(comment) = comments.next_item().await? {
            if comment.carries_marker(marker) {
                return Ok(Some(comment.id));
            }
        }
        Ok(None)
    }

    async fn create_comment(
        &self,
        pull_request: &PullRequestRef,
        content: &str,
    ) -> Result<(), PipeError> {
        let options = RequestOptions::new()
            .with_method(Method::POST)
            .with_body(comment_body(content));
        self.client
            .request::<Value>(pull_request.comments_path(), &options)
            .await?;
        Ok(())
    }

    async fn update_comment(
        &self,
        pull_request: &PullRequestRef,
        comment_id: u64,
        content: &str,
    ) -> Result<(), PipeError> {
        let options = RequestOptions::new()
            .with_method(Method::PUT)
            .with_body(comment_body(content));
        self.client
            .request::<Value>(pull_request.comment_path(comment_id), &options)
            .await?;
        Ok(())
    }
}
