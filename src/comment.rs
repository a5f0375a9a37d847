//! Comment body formatting.
//!
//! The identifier is appended as a Markdown link reference definition, which
//! Bitbucket does not render, so the marker stays invisible in the comment
//! while remaining searchable in the raw text.

/// Text and optional identifier of the comment to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSettings {
    /// Comment body. May be empty.
    pub content: String,
    /// Identifier used to find and update a previous comment.
    pub identifier: Option<String>,
}

/// Formats the hidden marker line for `identifier`.
#[must_use]
pub fn formatted_identifier(identifier: &str) -> String {
    format!("\n[comment]: # (bitbucket-pipe-pr-comment: {identifier})")
}

/// Builds the raw comment text: the content, followed by the marker line
/// when an identifier is set.
#[must_use]
pub fn comment_content(settings: &CommentSettings) -> String {
    match settings.identifier.as_deref() {
        Some(identifier) => format!("{}\n{}", settings.content, formatted_identifier(identifier)),
        None => settings.content.clone(),
    }
}
