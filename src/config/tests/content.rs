//! Tests for comment content and identifier resolution.

use std::io::Write;

use rstest::rstest;
use tempfile::NamedTempFile;

use super::helpers::{FALLBACK_KEYS, complete_config};
use crate::PipeConfig;
use crate::bitbucket::error::PipeError;

fn cleared_fallbacks() -> [(&'static str, Option<&'static str>); 3] {
    FALLBACK_KEYS.map(|key| (key, None))
}

fn content_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary file should be created");
    file.write_all(contents.as_bytes())
        .expect("temporary file should be writable");
    file
}

#[rstest]
fn inline_text_wins_over_file() {
    let _guard = env_lock::lock_env(cleared_fallbacks());
    let file = content_file("from file");
    let config = PipeConfig {
        content_text: Some("inline".to_owned()),
        content_file: Some(file.path().display().to_string()),
        ..complete_config()
    };

    let settings = config.comment_settings().expect("content should resolve");

    assert_eq!(settings.content, "inline");
}

#[rstest]
fn empty_inline_text_is_allowed() {
    let _guard = env_lock::lock_env(cleared_fallbacks());
    let config = PipeConfig {
        content_text: Some(String::new()),
        ..complete_config()
    };

    let settings = config.comment_settings().expect("empty content is valid");

    assert_eq!(settings.content, "");
}

#[rstest]
fn file_content_is_read_when_no_text() {
    let _guard = env_lock::lock_env(cleared_fallbacks());
    let file = content_file("This is test file content");
    let config = PipeConfig {
        content_text: None,
        content_file: Some(file.path().display().to_string()),
        ..complete_config()
    };

    let settings = config.comment_settings().expect("file should be read");

    assert_eq!(settings.content, "This is test file content");
}

#[rstest]
fn unreadable_file_names_absolute_path() {
    let _guard = env_lock::lock_env(cleared_fallbacks());
    let config = PipeConfig {
        content_text: None,
        content_file: Some("non-existent-file.txt".to_owned()),
        ..complete_config()
    };

    let result = config.comment_settings();

    match result {
        Err(PipeError::ContentFile { path }) => {
            assert!(path.ends_with("non-existent-file.txt"), "unexpected path: {path}");
            assert!(
                std::path::Path::new(&path).is_absolute(),
                "path should be absolute: {path}"
            );
        }
        other => panic!("expected ContentFile, got {other:?}"),
    }
}

#[rstest]
fn missing_content_is_rejected() {
    let _guard = env_lock::lock_env(cleared_fallbacks());
    let config = PipeConfig {
        content_text: None,
        content_file: None,
        ..complete_config()
    };

    assert_eq!(config.comment_settings(), Err(PipeError::MissingContent));
}

#[rstest]
fn bare_pipe_variables_are_used_as_fallback() {
    let _guard = env_lock::lock_env([
        ("CONTENT_TEXT", Some("from pipe variable")),
        ("CONTENT_FILE", None),
        ("COMMENT_IDENTIFIER", Some("coverage")),
    ]);
    let config = PipeConfig {
        content_text: None,
        comment_identifier: None,
        ..complete_config()
    };

    let settings = config.comment_settings().expect("fallbacks should resolve");

    assert_eq!(settings.content, "from pipe variable");
    assert_eq!(settings.identifier.as_deref(), Some("coverage"));
}

#[rstest]
fn prefixed_values_beat_bare_fallbacks() {
    let _guard = env_lock::lock_env([
        ("CONTENT_TEXT", Some("bare")),
        ("CONTENT_FILE", None),
        ("COMMENT_IDENTIFIER", Some("bare-id")),
    ]);
    let config = PipeConfig {
        content_text: Some("prefixed".to_owned()),
        comment_identifier: Some("prefixed-id".to_owned()),
        ..complete_config()
    };

    let settings = config.comment_settings().expect("content should resolve");

    assert_eq!(settings.content, "prefixed");
    assert_eq!(settings.identifier.as_deref(), Some("prefixed-id"));
}

#[rstest]
#[case::absent(None)]
#[case::empty(Some(String::new()))]
fn identifier_is_optional(#[case] identifier: Option<String>) {
    let _guard = env_lock::lock_env(cleared_fallbacks());
    let config = PipeConfig {
        comment_identifier: identifier,
        ..complete_config()
    };

    let settings = config.comment_settings().expect("content should resolve");

    assert!(settings.identifier.is_none());
}
