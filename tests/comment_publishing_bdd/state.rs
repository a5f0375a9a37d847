//! Scenario state and runtime/server initialisation for the comment
//! publishing BDD tests.

use std::cell::RefCell;
use std::rc::Rc;

use bitbucket_pr_comment::bitbucket::{PullRequestId, RepositorySlug, WorkspaceSlug};
use bitbucket_pr_comment::{
    ApiBase, BitbucketClient, BitbucketCommentGateway, CommentPublisher, CommentSettings,
    Credentials, PipeError, PublishOutcome, PullRequestRef,
};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// Shared runtime wrapper that can be stored in rstest-bdd Slot.
#[derive(Clone)]
pub(crate) struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    pub(crate) fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub(crate) fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

#[derive(ScenarioState, Default)]
pub(crate) struct PublishState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) pull_request: Slot<u64>,
    pub(crate) identifier: Slot<String>,
    pub(crate) outcome: Slot<PublishOutcome>,
    pub(crate) error: Slot<PipeError>,
}

/// Ensures the runtime and server are initialised in `PublishState`.
pub(crate) fn ensure_runtime_and_server(publish_state: &PublishState) -> SharedRuntime {
    if publish_state.runtime.with_ref(|_| ()).is_none() {
        let runtime = Runtime::new()
            .unwrap_or_else(|error| panic!("failed to create Tokio runtime: {error}"));
        publish_state.runtime.set(SharedRuntime::new(runtime));
    }

    let shared_runtime = publish_state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised after set"));

    if publish_state.server.with_ref(|_| ()).is_none() {
        publish_state
            .server
            .set(shared_runtime.block_on(MockServer::start()));
    }

    shared_runtime
}

/// Mounts `mock` on the scenario's server.
pub(crate) fn mount(publish_state: &PublishState, runtime: &SharedRuntime, mock: Mock) {
    publish_state
        .server
        .with_ref(|server| {
            runtime.block_on(mock.mount(server));
        })
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

/// Server-relative path of the comment collection for `pr`.
pub(crate) fn comments_path(pr: u64) -> String {
    format!("/2.0/repositories/team/service/pullrequests/{pr}/comments")
}

/// Runs the publisher against the scenario's server and records the result.
pub(crate) fn run_publish(publish_state: &PublishState, content: &str) -> Result<(), PipeError> {
    let server_url = publish_state
        .server
        .with_ref(MockServer::uri)
        .ok_or_else(|| PipeError::InvalidUrl("mock server URL missing".to_owned()))?;
    let runtime = publish_state
        .runtime
        .get()
        .ok_or_else(|| PipeError::Configuration {
            message: "runtime not initialised".to_owned(),
        })?;
    let pr = publish_state
        .pull_request
        .get()
        .ok_or_else(|| PipeError::Configuration {
            message: "pull request not configured".to_owned(),
        })?;

    let pull_request = PullRequestRef::new(
        WorkspaceSlug::new("team")?,
        RepositorySlug::new("service")?,
        PullRequestId::new(pr)?,
    );
    let settings = CommentSettings {
        content: content.to_owned(),
        identifier: publish_state.identifier.get(),
    };
    let client = BitbucketClient::new(
        Credentials::new("testuser", "testpass")?,
        ApiBase::parse(&format!("{server_url}/2.0"))?,
    );
    let gateway = BitbucketCommentGateway::new(client);

    let result = runtime.block_on(async {
        CommentPublisher::new(&gateway)
            .publish(&pull_request, &settings)
            .await
    });

    match result {
        Ok(outcome) => {
            drop(publish_state.error.take());
            publish_state.outcome.set(outcome);
        }
        Err(error) => {
            drop(publish_state.outcome.take());
            publish_state.error.set(error);
        }
    }

    Ok(())
}
