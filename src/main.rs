//! Pipe entrypoint: load configuration, then create or update the comment.

use std::io::{self, Write};
use std::process::ExitCode;

use bitbucket_pr_comment::{
    BitbucketClient, BitbucketCommentGateway, CommentPublisher, PipeConfig, PipeError,
    PublishOutcome,
};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), PipeError> {
    let config = load_config()?;
    let settings = config.settings()?;

    let client = BitbucketClient::new(settings.credentials, settings.api_base);
    let gateway = BitbucketCommentGateway::new(client);
    let publisher = CommentPublisher::new(&gateway);

    match publisher
        .publish(&settings.pull_request, &settings.comment)
        .await?
    {
        PublishOutcome::Created => tracing::info!(
            "created comment on pull request #{}",
            settings.pull_request.id().get()
        ),
        PublishOutcome::Updated { comment_id } => tracing::info!(
            "updated comment {comment_id} on pull request #{}",
            settings.pull_request.id().get()
        ),
    }
    Ok(())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`PipeError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PipeConfig, PipeError> {
    PipeConfig::load().map_err(|error| PipeError::Configuration {
        message: error.to_string(),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
