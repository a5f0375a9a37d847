//! Bitbucket Pipelines pipe that creates or updates a pull request comment.
//!
//! The library wraps the Bitbucket Cloud REST API with an authenticated
//! request executor and a cursor-following page traversal, then uses them to
//! find a previously posted comment by its hidden identifier and either
//! update it or post a new one.

pub mod bitbucket;
pub mod comment;
pub mod config;
pub mod publish;

pub use bitbucket::{
    ApiBase, BitbucketApiError, BitbucketClient, BitbucketCommentGateway, Credentials,
    PageEnvelope, PaginatedRequest, PipeError, PullRequestRef, RequestOptions, RequestTarget,
};
pub use comment::CommentSettings;
pub use config::{PipeConfig, Settings};
pub use publish::{CommentPublisher, PublishOutcome};
