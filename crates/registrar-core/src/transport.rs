//! Transport client
//!
//! Single choke-point for every outbound HTTP call made on behalf of the
//! registrar adapter. The client:
//!
//! 1. Validates the request descriptor (no I/O on failure)
//! 2. Builds the request with headers and encoded query parameters
//! 3. Executes it once (no retries, no caching)
//! 4. Classifies the outcome with the error taxonomy
//!
//! ## Outcomes
//!
//! | Upstream result | Returned |
//! |---|---|
//! | status in `[200, 300)` | `Ok(response)`, body unread |
//! | status `>= 300` | `Err` with kind from [`from_http_status`](crate::error::ErrorKind::from_http_status), message `"<status text>: <body>"` |
//! | connect/DNS/timeout failure | `Err(Internal)` |
//! | empty URL or method | `Err(InvalidArgument)`, nothing sent |

use crate::error::{Result, ServiceError};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

/// Content type for JSON bodies
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Default HTTP timeout for outbound requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Description of one outbound call
///
/// Built with the consuming builder methods and handed to
/// [`TransportClient::call`]. Query pairs keep their insertion order here;
/// the client sorts them by key when encoding.
#[derive(Clone, Default)]
pub struct CallRequest {
    method: String,
    url: String,
    body: Option<Vec<u8>>,
    authorization: String,
    content_type: String,
    query: Vec<(String, String)>,
}

// Authorization values are credentials; keep them out of logs.
impl fmt::Debug for CallRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .field(
                "authorization",
                &if self.authorization.is_empty() { "" } else { "<REDACTED>" },
            )
            .field("content_type", &self.content_type)
            .field("query", &self.query)
            .finish()
    }
}

impl CallRequest {
    /// Create a request descriptor for the given method and URL
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// `GET` request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// `POST` request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    /// `PUT` request
    pub fn put(url: impl Into<String>) -> Self {
        Self::new("PUT", url)
    }

    /// Set a raw request body
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body and set the JSON content type
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(self.body(body).content_type(CONTENT_TYPE_JSON))
    }

    /// Set the `Authorization` header value
    pub fn authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = authorization.into();
        self
    }

    /// Set the `Content-Type` header value
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// The HTTP method as given
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The target URL as given (without the added query parameters)
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters in insertion order
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Reject descriptors that can never be sent
    fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(ServiceError::invalid_argument("URL must not be empty"));
        }
        if self.method.trim().is_empty() {
            return Err(ServiceError::invalid_argument("Method must not be empty"));
        }
        Ok(())
    }

    fn parsed_method(&self) -> Result<Method> {
        Method::from_bytes(self.method.trim().to_uppercase().as_bytes()).map_err(|e| {
            ServiceError::internal(format!(
                "Error building http request: invalid method {}: {}",
                self.method, e
            ))
        })
    }

    /// Final URL with existing and added query pairs merged and sorted by key
    pub fn encoded_url(&self) -> Result<Url> {
        let mut url = Url::parse(self.url.trim()).map_err(|e| {
            ServiceError::internal(format!(
                "Error building http request: invalid URL {}: {}",
                self.url, e
            ))
        })?;

        if self.query.is_empty() {
            return Ok(url);
        }

        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        pairs.extend(self.query.iter().cloned());
        // Stable: values of a repeated key keep their relative order
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        url.query_pairs_mut()
            .clear()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        Ok(url)
    }
}

/// Outbound HTTP client used by every registrar call
#[derive(Debug, Clone)]
pub struct TransportClient {
    client: reqwest::Client,
}

impl TransportClient {
    /// Create a client with [`DEFAULT_HTTP_TIMEOUT`]
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client with the given request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Perform one call in the positional form
    ///
    /// Equivalent to building a [`CallRequest`] from the arguments and calling
    /// [`TransportClient::call`]. Empty `authorization` / `content_type` are
    /// not sent.
    pub async fn call_with(
        &self,
        method: &str,
        url: &str,
        body: Option<Vec<u8>>,
        authorization: &str,
        content_type: &str,
        query: &[(&str, &str)],
    ) -> Result<Response> {
        let mut request = CallRequest::new(method, url)
            .authorization(authorization)
            .content_type(content_type);
        if let Some(body) = body {
            request = request.body(body);
        }
        for (key, value) in query {
            request = request.query(*key, *value);
        }
        self.call(request).await
    }

    /// Perform one call
    ///
    /// # Returns
    ///
    /// - `Ok(Response)`: status in `[200, 300)`, body not consumed
    /// - `Err(ServiceError)`: classified failure (see module docs)
    pub async fn call(&self, request: CallRequest) -> Result<Response> {
        if let Err(e) = request.validate() {
            error!("Failed validation when doing http call: {}", e);
            return Err(e);
        }

        let method = request.parsed_method()?;
        let url = request.encoded_url()?;

        let mut builder = self.client.request(method.clone(), url.clone());
        if !request.authorization.is_empty() {
            builder = builder.header(AUTHORIZATION, request.authorization.as_str());
        }
        if !request.content_type.is_empty() {
            builder = builder.header(CONTENT_TYPE, request.content_type.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        debug!("Sending {} {}", method, url);

        let response = builder.send().await.map_err(|e| {
            error!("Error doing {} http request to {}: {}", method, url, e);
            if e.is_builder() {
                ServiceError::internal("Error building http request")
            } else {
                ServiceError::internal("Error during http call")
            }
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let err = classify_failure(response).await;
        error!(
            status = ?err.status(),
            kind = %err.kind(),
            "Error doing {} http request to {}: {}",
            method,
            url,
            err
        );
        Err(err)
    }
}

/// Read the whole body of a non-success response into a classified error
async fn classify_failure(response: Response) -> ServiceError {
    let status = response.status();
    let body = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            warn!("Unable to read error response body ({}): {}", status, e);
            String::new()
        }
    };
    let status_text = status.canonical_reason().unwrap_or("");
    ServiceError::from_http_status(status.as_u16(), format!("{}: {}", status_text, body))
}
