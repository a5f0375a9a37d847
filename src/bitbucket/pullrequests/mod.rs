//! Pull request addressing and the comment gateway.
//!
//! The gateway trait is the seam the publisher talks to, so the
//! find-then-create-or-update flow can be tested without any HTTP at all.

mod comments;

pub use comments::{BitbucketCommentGateway, CommentContent, PullRequestComment};

use async_trait::async_trait;

use super::error::PipeError;

/// Workspace slug wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSlug(String);

impl WorkspaceSlug {
    /// Rejects empty slugs.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::MissingConfiguration`] for an empty value.
    pub fn new(value: &str) -> Result<Self, PipeError> {
        non_empty(value, "BITBUCKET_WORKSPACE").map(Self)
    }

    /// Borrow the slug.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository slug wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug(String);

impl RepositorySlug {
    /// Rejects empty slugs.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::MissingConfiguration`] for an empty value.
    pub fn new(value: &str) -> Result<Self, PipeError> {
        non_empty(value, "BITBUCKET_REPO_SLUG").map(Self)
    }

    /// Borrow the slug.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestId(u64);

impl PullRequestId {
    /// Rejects zero.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidConfiguration`] when the value is zero.
    pub fn new(value: u64) -> Result<Self, PipeError> {
        if value == 0 {
            return Err(PipeError::InvalidConfiguration {
                message: "Invalid value for BITBUCKET_PR_ID: 0. Expected a positive integer."
                    .to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

fn non_empty(value: &str, key: &str) -> Result<String, PipeError> {
    if value.is_empty() {
        return Err(PipeError::MissingConfiguration {
            message: format!("Missing required configuration variable: {key}"),
        });
    }
    Ok(value.to_owned())
}

/// Identifies one pull request in one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    workspace: WorkspaceSlug,
    repository: RepositorySlug,
    id: PullRequestId,
}

impl PullRequestRef {
    /// Bundles validated identifiers.
    #[must_use]
    pub const fn new(workspace: WorkspaceSlug, repository: RepositorySlug, id: PullRequestId) -> Self {
        Self {
            workspace,
            repository,
            id,
        }
    }

    /// Workspace slug.
    #[must_use]
    pub const fn workspace(&self) -> &WorkspaceSlug {
        &self.workspace
    }

    /// Repository slug.
    #[must_use]
    pub const fn repository(&self) -> &RepositorySlug {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn id(&self) -> PullRequestId {
        self.id
    }

    /// Path of the pull request's comment collection, relative to the API base.
    #[must_use]
    pub fn comments_path(&self) -> String {
        format!(
            "repositories/{}/{}/pullrequests/{}/comments",
            self.workspace.as_str(),
            self.repository.as_str(),
            self.id.get()
        )
    }

    /// Path of a single comment, relative to the API base.
    #[must_use]
    pub fn comment_path(&self, comment_id: u64) -> String {
        format!("{}/{comment_id}", self.comments_path())
    }
}

/// Gateway for reading and writing pull request comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestCommentGateway: Send + Sync {
    /// Returns the id of the first live comment whose raw content contains
    /// `marker`.
    async fn find_comment(
        &self,
        pull_request: &PullRequestRef,
        marker: &str,
    ) -> Result<Option<u64>, PipeError>;

    /// Posts a new comment.
    async fn create_comment(
        &self,
        pull_request: &PullRequestRef,
        content: &str,
    ) -> Result<(), PipeError>;

    /// Replaces the content of an existing comment.
    async fn update_comment(
        &self,
        pull_request: &PullRequestRef,
        comment_id: u64,
        content: &str,
    ) -> Result<(), PipeError>;
}
