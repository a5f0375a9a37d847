//! Bitbucket Cloud REST API access.
//!
//! The layer is split into a single-request executor ([`BitbucketClient`])
//! and a cursor-following traversal ([`PaginatedRequest`]) built on top of it.
//! Both go through the [`HttpTransport`] trait, and every failure that comes
//! back from the server is surfaced as a [`BitbucketApiError`] carrying the
//! status, URL, raw body and the extra fields of Bitbucket's error envelope.

pub mod client;
pub mod credentials;
pub mod error;
pub mod pagination;
pub mod pullrequests;
pub mod request;
pub mod transport;

pub use client::BitbucketClient;
pub use credentials::Credentials;
pub use error::{BitbucketApiError, INVALID_JSON_MESSAGE, MISSING_ERROR_MESSAGE, PipeError};
pub use pagination::{PageEnvelope, PaginatedRequest};
pub use pullrequests::{
    BitbucketCommentGateway, PullRequestComment, PullRequestCommentGateway, PullRequestId,
    PullRequestRef, RepositorySlug, WorkspaceSlug,
};
pub use request::{ApiBase, DEFAULT_API_BASE, RequestOptions, RequestTarget};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

#[cfg(test)]
pub use pullrequests::MockPullRequestCommentGateway;
