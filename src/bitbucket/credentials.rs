//! Credential wrapper used to authenticate every Bitbucket request.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::PipeError;

/// Username and app password pair for HTTP Basic authentication.
///
/// The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Validates that both halves of the pair are present.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::MissingConfiguration`] when either value is empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, PipeError> {
        let user = username.into();
        let secret = password.into();
        if user.is_empty() {
            return Err(PipeError::MissingConfiguration {
                message: "Missing required configuration variable: BITBUCKET_USERNAME".to_owned(),
            });
        }
        if secret.is_empty() {
            return Err(PipeError::MissingConfiguration {
                message: "Missing required configuration variable: BITBUCKET_APP_PASSWORD"
                    .to_owned(),
            });
        }
        Ok(Self {
            username: user,
            password: secret,
        })
    }

    /// Borrow the username.
    #[must_use]
    pub const fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Value of the `Authorization` header: `Basic <base64(username:password)>`.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
