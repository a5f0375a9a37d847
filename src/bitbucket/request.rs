//! Request descriptors: where a request goes and how it deviates from the
//! defaults.

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::Method;
use url::Url;

use super::credentials::Credentials;
use super::error::PipeError;
use super::transport::HttpRequest;

/// Production Bitbucket Cloud API base.
pub const DEFAULT_API_BASE: &str = "https://api.bitbucket.org/2.0";

const JSON_MEDIA_TYPE: &str = "application/json";

/// API base URL that relative request paths are appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(String);

impl ApiBase {
    /// Validates the base and strips any trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidUrl`] when the value is not an absolute URL.
    pub fn parse(value: &str) -> Result<Self, PipeError> {
        let trimmed = value.trim_end_matches('/');
        Url::parse(trimmed).map_err(|error| PipeError::InvalidUrl(format!("{value}: {error}")))?;
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the base without a trailing slash.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for ApiBase {
    fn default() -> Self {
        Self(DEFAULT_API_BASE.to_owned())
    }
}

/// Target of a request: a path under the API base, or a URL the server
/// handed back (such as a pagination cursor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    /// Path appended to the API base as `base + "/" + path`.
    Path(String),
    /// Already-resolved URL, used verbatim.
    Absolute(Url),
}

impl RequestTarget {
    /// Resolves the target to the URL that will be requested.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidUrl`] when the joined path is not a URL.
    pub fn resolve(&self, api_base: &ApiBase) -> Result<Url, PipeError> {
        match self {
            Self::Path(path) => {
                let joined = format!("{}/{path}", api_base.as_str());
                Url::parse(&joined).map_err(|error| PipeError::InvalidUrl(format!("{joined}: {error}")))
            }
            Self::Absolute(url) => Ok(url.clone()),
        }
    }
}

impl From<&str> for RequestTarget {
    fn from(path: &str) -> Self {
        Self::Path(path.to_owned())
    }
}

impl From<String> for RequestTarget {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<Url> for RequestTarget {
    fn from(url: Url) -> Self {
        Self::Absolute(url)
    }
}

/// Per-request overrides: method, body and headers.
///
/// Header overrides replace defaults with the same name, so a caller can
/// swap out `Accept` or even `Authorization` for a single call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    method: Option<Method>,
    body: Option<String>,
    headers: HeaderMap,
}

impl RequestOptions {
    /// Options for a plain `GET` with default headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the request body. A non-empty body implies a default
    /// `Content-Type` of JSON.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a header that takes precedence over any default of that name.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Method that will be used, `GET` when unset.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method.clone().unwrap_or(Method::GET)
    }

    /// Request body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Caller-supplied header overrides.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Computes the default headers and merges the caller's overrides on top.
///
/// # Errors
///
/// Returns [`PipeError::InvalidHeader`] when the authorization value cannot
/// be encoded as a header.
pub fn build_headers(
    credentials: &Credentials,
    options: &RequestOptions,
) -> Result<HeaderMap, PipeError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));

    let mut authorization = HeaderValue::from_str(&credentials.authorization_header())
        .map_err(|error| PipeError::InvalidHeader {
            message: format!("authorization: {error}"),
        })?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);

    if options.body.as_deref().is_some_and(|body| !body.is_empty()) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
    }

    for name in options.headers.keys() {
        headers.remove(name);
        for value in options.headers.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    Ok(headers)
}

/// Turns a target and its options into a transport-ready request.
///
/// # Errors
///
/// Propagates URL resolution and header encoding failures.
pub fn build_request(
    credentials: &Credentials,
    api_base: &ApiBase,
    target: &RequestTarget,
    options: &RequestOptions,
) -> Result<HttpRequest, PipeError> {
    Ok(HttpRequest {
        method: options.method(),
        url: target.resolve(api_base)?,
        headers: build_headers(credentials, options)?,
        body: options.body.clone(),
    })
}
