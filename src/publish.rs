//! Find-then-create-or-update flow used by the pipe entrypoint.

use crate::bitbucket::error::PipeError;
use crate::bitbucket::pullrequests::{PullRequestCommentGateway, PullRequestRef};
use crate::comment::{CommentSettings, comment_content, formatted_identifier};

/// What the publisher did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new comment was posted.
    Created,
    /// An existing comment carrying the identifier was replaced.
    Updated {
        /// Id of the updated comment.
        comment_id: u64,
    },
}

/// Publishes a comment through a gateway.
pub struct CommentPublisher<'client, Gateway>
where
    Gateway: PullRequestCommentGateway,
{
    gateway: &'client Gateway,
}

impl<'client, Gateway> CommentPublisher<'client, Gateway>
where
    Gateway: PullRequestCommentGateway,
{
    /// Create a new publisher using the provided gateway.
    #[must_use]
    pub const fn new(gateway: &'client Gateway) -> Self {
        Self { gateway }
    }

    /// Updates the comment carrying the configured identifier, or creates a
    /// new one when there is no identifier or no match.
    ///
    /// # Errors
    ///
    /// Propagates any failure from the gateway.
    pub async fn publish(
        &self,
        pull_request: &PullRequestRef,
        settings: &CommentSettings,
    ) -> Result<PublishOutcome, PipeError> {
        let existing = match settings.identifier.as_deref() {
            Some(identifier) => {
                let marker = formatted_identifier(identifier);
                self.gateway.find_comment(pull_request, &marker).await?
            }
            None => None,
        };
        let content = comment_content(settings);

        if let Some(comment_id) = existing {
            self.gateway
                .update_comment(pull_request, comment_id, &content)
                .await?;
            return Ok(PublishOutcome::Updated { comment_id });
        }

        self.gateway.create_comment(pull_request, &content).await?;
        Ok(PublishOutcome::Created)
    }
}
