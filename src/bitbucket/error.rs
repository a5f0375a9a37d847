//! Error types exposed by the Bitbucket API layer.

use std::fmt;

use http::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

/// Message used when a response body cannot be parsed as JSON.
pub const INVALID_JSON_MESSAGE: &str = "Response did not contain valid JSON data.";

/// Message used when a failing response carries no `error.message` field.
pub const MISSING_ERROR_MESSAGE: &str = "Response did not contain an error message.";

/// Errors surfaced while loading configuration or talking to Bitbucket.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipeError {
    /// A required configuration value was not supplied.
    #[error("{message}")]
    MissingConfiguration {
        /// Message naming the missing variable.
        message: String,
    },

    /// A configuration value was supplied but could not be interpreted.
    #[error("{message}")]
    InvalidConfiguration {
        /// Description of the invalid value.
        message: String,
    },

    /// Neither inline comment content nor a content file was configured.
    #[error(
        "Comment content not provided: you must provide either CONTENT_TEXT or CONTENT_FILE."
    )]
    MissingContent,

    /// The configured content file could not be read.
    #[error("Failed to read file {path}: File does not exist or is not readable.")]
    ContentFile {
        /// Absolute path of the file that failed to load.
        path: String,
    },

    /// Configuration layers could not be loaded or merged.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// A base URL or resolved request locator is not a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The server returned a forward cursor that is not an absolute URL.
    #[error("pagination cursor is not an absolute URL: {cursor}")]
    InvalidCursor {
        /// The cursor value exactly as returned by the server.
        cursor: String,
    },

    /// A header name or value could not be encoded.
    #[error("invalid header: {message}")]
    InvalidHeader {
        /// Encoding failure detail.
        message: String,
    },

    /// The transport failed before a response was received.
    #[error("network error talking to Bitbucket: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Bitbucket answered, but the response was an error or could not be
    /// decoded.
    #[error(transparent)]
    Api(Box<BitbucketApiError>),

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

/// A decoded failure response from the Bitbucket API.
///
/// Carries the server's message, the HTTP status, the URL the response came
/// from, the raw body text and every sibling of `error.message` in the error
/// envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitbucketApiError {
    message: String,
    status: StatusCode,
    url: Url,
    body: String,
    detail: Map<String, Value>,
}

impl BitbucketApiError {
    /// Creates an error with an empty detail map.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        status: StatusCode,
        url: Url,
        body: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            status,
            url,
            body: body.into(),
            detail: Map::new(),
        }
    }

    /// Attaches the extra fields from the server's error envelope.
    #[must_use]
    pub fn with_detail(mut self, detail: Map<String, Value>) -> Self {
        self.detail = detail;
        self
    }

    /// Human-readable message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// URL of the response.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Raw response body text.
    #[must_use]
    pub const fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Extra fields from the error envelope, `message` excluded.
    #[must_use]
    pub const fn detail(&self) -> &Map<String, Value> {
        &self.detail
    }
}

impl fmt::Display for BitbucketApiError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl std::error::Error for BitbucketApiError {}

impl From<BitbucketApiError> for PipeError {
    fn from(error: BitbucketApiError) -> Self {
        Self::Api(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use serde_json::{Map, Value, json};
    use url::Url;

    use super::{BitbucketApiError, PipeError};

    fn url() -> Url {
        Url::parse("https://api.test.com").expect("static URL should parse")
    }

    #[test]
    fn carries_every_field() {
        let mut detail = Map::new();
        detail.insert("field".to_owned(), json!("test"));
        detail.insert("code".to_owned(), json!(123));

        let error = BitbucketApiError::new("Test message", StatusCode::BAD_REQUEST, url(), "response body")
            .with_detail(detail.clone());

        assert_eq!(error.message(), "Test message");
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.url().as_str(), "https://api.test.com/");
        assert_eq!(error.body(), "response body");
        assert_eq!(error.detail(), &detail);
    }

    #[test]
    fn detail_defaults_to_empty() {
        let error = BitbucketApiError::new("Test message", StatusCode::NOT_FOUND, url(), "not found");

        assert!(error.detail().is_empty());
    }

    #[test]
    fn pipe_error_displays_server_message() {
        let error = PipeError::from(BitbucketApiError::new(
            "Resource not found",
            StatusCode::NOT_FOUND,
            url(),
            "{}",
        ));

        assert_eq!(error.to_string(), "Resource not found");
        assert!(matches!(error, PipeError::Api(ref api) if api.detail() == &Map::<String, Value>::new()));
    }
}
