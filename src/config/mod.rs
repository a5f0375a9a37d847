//! Pipe configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in defaults (only `api_base` has one)
//! 2. **Configuration file** – `.bitbucket-pr-comment.toml` in the current
//!    directory, home directory, or XDG config directory
//! 3. **Environment variables** – `BITBUCKET_*`, which is also what
//!    Bitbucket Pipelines injects into every step
//! 4. **Command-line arguments** – `--username`, `--pr-id`, ...
//!
//! The comment settings additionally fall back to the bare `CONTENT_TEXT`,
//! `CONTENT_FILE` and `COMMENT_IDENTIFIER` variables used in pipe
//! definitions.
//!
//! # Configuration File
//!
//! ```toml
//! workspace = "team"
//! repo_slug = "service"
//! content_file = "reports/coverage.md"
//! comment_identifier = "coverage"
//! ```

use std::env;
use std::fs;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::bitbucket::credentials::Credentials;
use crate::bitbucket::error::PipeError;
use crate::bitbucket::pullrequests::{PullRequestId, PullRequestRef, RepositorySlug, WorkspaceSlug};
use crate::bitbucket::request::ApiBase;
use crate::comment::CommentSettings;

const PR_ID_MISSING_MESSAGE: &str = concat!(
    "Missing required configuration variable BITBUCKET_PR_ID: ",
    "This pipe can only be used in a pull request pipeline."
);

/// Pipe configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `BITBUCKET_USERNAME` or `--username`: Bitbucket username
/// - `BITBUCKET_APP_PASSWORD` or `--app-password`: App password
/// - `BITBUCKET_PR_ID` or `--pr-id`: Pull request number
/// - `BITBUCKET_WORKSPACE` or `--workspace`: Workspace slug
/// - `BITBUCKET_REPO_SLUG` or `--repo-slug`: Repository slug
/// - `BITBUCKET_CONTENT_TEXT`, `CONTENT_TEXT`, or `--content-text`: Comment text
/// - `BITBUCKET_CONTENT_FILE`, `CONTENT_FILE`, or `--content-file`: File with the comment text
/// - `BITBUCKET_COMMENT_IDENTIFIER`, `COMMENT_IDENTIFIER`, or `--comment-identifier`
/// - `BITBUCKET_API_BASE` or `--api-base`: API base URL
///
/// # Example
///
/// ```no_run
/// use bitbucket_pr_comment::PipeConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = PipeConfig::load().expect("failed to load configuration");
/// let settings = config.settings().expect("configuration incomplete");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "BITBUCKET",
    discovery(
        dotfile_name = ".bitbucket-pr-comment.toml",
        config_file_name = "bitbucket-pr-comment.toml",
        app_name = "bitbucket-pr-comment"
    )
)]
pub struct PipeConfig {
    /// Bitbucket username used for Basic authentication.
    #[ortho_config(cli_short = 'u')]
    pub username: Option<String>,

    /// App password paired with `username`.
    #[ortho_config(cli_short = 'p')]
    pub app_password: Option<String>,

    /// Pull request number. Bitbucket only sets this in pull request
    /// pipelines.
    pub pr_id: Option<u64>,

    /// Workspace slug.
    #[ortho_config(cli_short = 'w')]
    pub workspace: Option<String>,

    /// Repository slug.
    #[ortho_config(cli_short = 'r')]
    pub repo_slug: Option<String>,

    /// Inline comment content. Takes precedence over `content_file`, even
    /// when empty.
    #[ortho_config(cli_short = 't')]
    pub content_text: Option<String>,

    /// Path to a file holding the comment content, relative to the working
    /// directory.
    #[ortho_config(cli_short = 'f')]
    pub content_file: Option<String>,

    /// Identifier used to find and update a previously posted comment.
    #[ortho_config(cli_short = 'i')]
    pub comment_identifier: Option<String>,

    /// Bitbucket API base URL. Defaults to Bitbucket Cloud.
    pub api_base: Option<String>,
}

/// Fully validated settings for one pipe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Authentication pair.
    pub credentials: Credentials,
    /// Target pull request.
    pub pull_request: PullRequestRef,
    /// What to post.
    pub comment: CommentSettings,
    /// Where the API lives.
    pub api_base: ApiBase,
}

impl PipeConfig {
    /// Validates every section and bundles them for the publisher.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure from [`Self::credentials`],
    /// [`Self::pull_request`], [`Self::comment_settings`] or
    /// [`Self::resolve_api_base`].
    pub fn settings(&self) -> Result<Settings, PipeError> {
        Ok(Settings {
            credentials: self.credentials()?,
            pull_request: self.pull_request()?,
            comment: self.comment_settings()?,
            api_base: self.resolve_api_base()?,
        })
    }

    /// Builds the credential pair.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::MissingConfiguration`] when the username or app
    /// password is missing or empty.
    pub fn credentials(&self) -> Result<Credentials, PipeError> {
        Credentials::new(
            require(self.username.as_deref(), "BITBUCKET_USERNAME")?,
            require(self.app_password.as_deref(), "BITBUCKET_APP_PASSWORD")?,
        )
    }

    /// Builds the pull request reference.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::MissingConfiguration`] when a value is missing,
    /// with a pull-request-pipeline hint for `BITBUCKET_PR_ID`, and
    /// [`PipeError::InvalidConfiguration`] when the id is zero.
    pub fn pull_request(&self) -> Result<PullRequestRef, PipeError> {
        let id = self.pr_id.ok_or_else(|| PipeError::MissingConfiguration {
            message: PR_ID_MISSING_MESSAGE.to_owned(),
        })?;
        let workspace = require(self.workspace.as_deref(), "BITBUCKET_WORKSPACE")?;
        let repository = require(self.repo_slug.as_deref(), "BITBUCKET_REPO_SLUG")?;

        Ok(PullRequestRef::new(
            WorkspaceSlug::new(workspace)?,
            RepositorySlug::new(repository)?,
            PullRequestId::new(id)?,
        ))
    }

    /// Resolves the comment content and identifier.
    ///
    /// Inline text wins over a content file. Each value falls back to its
    /// bare pipe variable (`CONTENT_TEXT`, `CONTENT_FILE`,
    /// `COMMENT_IDENTIFIER`) when not configured under the `BITBUCKET_`
    /// prefix.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::MissingContent`] when neither source is set and
    /// [`PipeError::ContentFile`] when the file cannot be read.
    pub fn comment_settings(&self) -> Result<CommentSettings, PipeError> {
        let text = with_fallback(self.content_text.as_ref(), "CONTENT_TEXT");
        let content = match text {
            Some(inline) => inline,
            None => {
                let file = with_fallback(self.content_file.as_ref(), "CONTENT_FILE")
                    .filter(|path| !path.is_empty())
                    .ok_or(PipeError::MissingContent)?;
                read_content_file(&file)?
            }
        };

        Ok(CommentSettings {
            content,
            identifier: with_fallback(self.comment_identifier.as_ref(), "COMMENT_IDENTIFIER")
                .filter(|identifier| !identifier.is_empty()),
        })
    }

    /// Parses the configured API base, or returns the Bitbucket Cloud one.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidUrl`] when the value is not a URL.
    pub fn resolve_api_base(&self) -> Result<ApiBase, PipeError> {
        self.api_base
            .as_deref()
            .map_or_else(|| Ok(ApiBase::default()), ApiBase::parse)
    }
}

fn require<'value>(value: Option<&'value str>, key: &str) -> Result<&'value str, PipeError> {
    value
        .filter(|present| !present.is_empty())
        .ok_or_else(|| PipeError::MissingConfiguration {
            message: format!("Missing required configuration variable: {key}"),
        })
}

fn with_fallback(value: Option<&String>, fallback_key: &str) -> Option<String> {
    value.cloned().or_else(|| env::var(fallback_key).ok())
}

fn read_content_file(path: &str) -> Result<String, PipeError> {
    let absolute = env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.into());

    fs::read_to_string(&absolute).map_err(|_| PipeError::ContentFile {
        path: absolute.display().to_string(),
    })
}

#[cfg(test)]
mod tests;
