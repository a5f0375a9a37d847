//! Support modules for the comment publishing BDD tests.

pub(crate) mod state;

pub(crate) use state::{
    PublishState, comments_path, ensure_runtime_and_server, mount, run_publish,
};
