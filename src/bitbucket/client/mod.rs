//! Single-request executor for the Bitbucket REST API.
//!
//! Every call goes out with Basic authentication and JSON defaults, and
//! every response is read as text first so that malformed bodies, failing
//! statuses and shape mismatches each map to a [`BitbucketApiError`] that
//! keeps the raw body around for diagnosis.

use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use super::credentials::Credentials;
use super::error::{BitbucketApiError, INVALID_JSON_MESSAGE, MISSING_ERROR_MESSAGE, PipeError};
use super::pagination::PaginatedRequest;
use super::request::{ApiBase, RequestOptions, RequestTarget, build_request};
use super::transport::{HttpResponse, HttpTransport, ReqwestTransport};

/// Authenticated Bitbucket API client.
#[derive(Debug, Clone)]
pub struct BitbucketClient<Transport = ReqwestTransport> {
    transport: Transport,
    credentials: Credentials,
    api_base: ApiBase,
}

impl BitbucketClient<ReqwestTransport> {
    /// Creates a client that talks to `api_base` over `reqwest`.
    #[must_use]
    pub fn new(credentials: Credentials, api_base: ApiBase) -> Self {
        Self::with_transport(ReqwestTransport::default(), credentials, api_base)
    }
}

impl<Transport> BitbucketClient<Transport>
where
    Transport: HttpTransport,
{
    /// Creates a client over an explicit transport.
    #[must_use]
    pub const fn with_transport(
        transport: Transport,
        credentials: Credentials,
        api_base: ApiBase,
    ) -> Self {
        Self {
            transport,
            credentials,
            api_base,
        }
    }

    /// Base URL that relative paths resolve against.
    #[must_use]
    pub const fn api_base(&self) -> &ApiBase {
        &self.api_base
    }

    /// Performs exactly one request and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// - [`PipeError::Network`] when the transport fails; passed through
    ///   untouched.
    /// - [`PipeError::Api`] when the body is not JSON, when a failing status
    ///   carries an error envelope, or when a successful body does not match
    ///   `Payload`.
    /// - [`PipeError::InvalidUrl`] / [`PipeError::InvalidHeader`] when the
    ///   request cannot be built.
    pub async fn request<Payload>(
        &self,
        target: impl Into<RequestTarget>,
        options: &RequestOptions,
    ) -> Result<Payload, PipeError>
    where
        Payload: DeserializeOwned,
    {
        let request = build_request(&self.credentials, &self.api_base, &target.into(), options)?;
        tracing::debug!("{} {}", request.method, request.url);

        let response = self.transport.send(request).await?;
        tracing::debug!("{} from {}", response.status, response.url);

        parse_response(response)
    }

    /// Starts a lazy traversal of a paginated listing at `path`.
    ///
    /// `options` are applied to every page fetch. Nothing is requested until
    /// the traversal is first pulled.
    #[must_use]
    pub fn paginate<Item>(
        &self,
        path: impl Into<String>,
        options: RequestOptions,
    ) -> PaginatedRequest<'_, Item, Transport>
    where
        Item: DeserializeOwned,
    {
        PaginatedRequest::new(self, RequestTarget::Path(path.into()), options)
    }
}

/// Decodes a response, translating every failure into a [`BitbucketApiError`].
pub(crate) fn parse_response<Payload>(response: HttpResponse) -> Result<Payload, PipeError>
where
    Payload: DeserializeOwned,
{
    let HttpResponse { status, url, body } = response;

    let Ok(parsed) = serde_json::from_str::<Value>(&body) else {
        return Err(BitbucketApiError::new(INVALID_JSON_MESSAGE, status, url, body).into());
    };

    if status.is_success() {
        return serde_json::from_value(parsed).map_err(|error| {
            BitbucketApiError::new(
                format!("Response did not match the expected shape: {error}"),
                status,
                url,
                body,
            )
            .into()
        });
    }

    Err(error_from_envelope(parsed, status, url, body).into())
}

/// Splits a `{type, error: {message, ...}}` envelope into message and detail.
///
/// Envelopes without a string `error.message` fall back to
/// [`MISSING_ERROR_MESSAGE`]; any other fields under `error` still land in
/// the detail map.
fn error_from_envelope(envelope: Value, status: StatusCode, url: Url, body: String) -> BitbucketApiError {
    let mut detail = match envelope {
        Value::Object(mut root) => match root.remove("error") {
            Some(Value::Object(fields)) => fields,
            _ => Map::new(),
        },
        _ => Map::new(),
    };

    let message = match detail.remove("message") {
        Some(Value::String(text)) => text,
        _ => MISSING_ERROR_MESSAGE.to_owned(),
    };

    BitbucketApiError::new(message, status, url, body).with_detail(detail)
}
