//! Unit tests for configuration loading and resolution.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `resolution`: Credential, pull request and API base resolution tests
//! - `content`: Comment content and identifier resolution tests

mod content;
mod helpers;
