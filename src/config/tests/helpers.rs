//! Shared test helpers for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::PipeConfig;

/// Bare pipe variables that [`PipeConfig::comment_settings`] falls back to.
pub const FALLBACK_KEYS: [&str; 3] = ["CONTENT_TEXT", "CONTENT_FILE", "COMMENT_IDENTIFIER"];

/// Applies a configuration layer to the composer based on the layer type.
pub fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

/// Helper to compose a [`PipeConfig`] from a sequence of `(layer_type, value)` pairs.
pub fn build_config_from_layers(layers: &[(&str, Value)]) -> PipeConfig {
    let mut composer = MergeComposer::new();

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value.clone());
    }

    PipeConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}

/// A configuration with every required value present.
pub fn complete_config() -> PipeConfig {
    PipeConfig {
        username: Some("testuser".to_owned()),
        app_password: Some("testpass".to_owned()),
        pr_id: Some(123),
        workspace: Some("test-workspace".to_owned()),
        repo_slug: Some("test-repo".to_owned()),
        content_text: Some("Hello".to_owned()),
        ..Default::default()
    }
}
