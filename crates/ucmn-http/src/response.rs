//! HTTP response types

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// Result type returned by HTTP operations, generic over the value R and error E
pub type HttpResult<R, E = HttpError> = Result<R, E>;

/// Content type used for JSON bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Undecoded body of a non-2xx response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl ErrorBody {
    /// Create a new error body
    pub fn new(content_type: Option<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Create an `application/json` error body from text
    pub fn json(text: impl Into<String>) -> Self {
        Self::new(Some(JSON_CONTENT_TYPE.to_string()), text.into().into_bytes())
    }

    /// Content type reported for the body, if any
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Raw bytes of the body
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Body as UTF-8 text
    pub fn text(&self) -> HttpResult<&str> {
        std::str::from_utf8(&self.bytes).map_err(|e| HttpError::Serialization(e.to_string()))
    }

    /// Deserialize the body as JSON
    pub fn json_as<R: DeserializeOwned>(&self) -> HttpResult<R> {
        serde_json::from_slice(&self.bytes).map_err(HttpError::from)
    }
}

/// A completed HTTP exchange with a decoded body
///
/// Successful (2xx) responses carry the decoded body, if the server sent one.
/// Every other status carries the raw [`ErrorBody`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse<T> {
    status: u16,
    headers: HeaderMap,
    body: Option<T>,
    error_body: Option<ErrorBody>,
}

impl<T> HttpResponse<T> {
    pub(crate) fn from_parts(
        status: u16,
        headers: HeaderMap,
        body: Option<T>,
        error_body: Option<ErrorBody>,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            error_body,
        }
    }

    /// A `200 OK` response with the given body
    pub fn ok(body: T) -> Self {
        Self::from_parts(200, HeaderMap::new(), Some(body), None)
    }

    /// A successful response; `status` must be in the 2xx range
    pub fn success(status: u16, body: Option<T>) -> HttpResult<Self> {
        if !(200..300).contains(&status) {
            return Err(HttpError::InvalidStatus(status));
        }
        Ok(Self::from_parts(status, HeaderMap::new(), body, None))
    }

    /// An error response; `status` must be 400 or above
    pub fn error(status: u16, error_body: ErrorBody) -> HttpResult<Self> {
        if status < 400 {
            return Err(HttpError::InvalidStatus(status));
        }
        Ok(Self::from_parts(
            status,
            HeaderMap::new(),
            None,
            Some(error_body),
        ))
    }

    /// A `400 Bad Request` response with the given error body
    pub fn bad_request(error_body: ErrorBody) -> Self {
        Self::from_parts(400, HeaderMap::new(), None, Some(error_body))
    }

    /// Replace the response headers
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Check if the response status is a success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response status is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response status is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Get the response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decoded body of a successful response
    pub fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    /// Consume the response, returning the decoded body
    pub fn into_body(self) -> Option<T> {
        self.body
    }

    /// Raw body of an unsuccessful response
    pub fn error_body(&self) -> Option<&ErrorBody> {
        self.error_body.as_ref()
    }
}

impl<T: DeserializeOwned> HttpResponse<T> {
    /// Read a reqwest response, decoding 2xx bodies as JSON
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> HttpResult<Self> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(HttpError::from)?;

        if (200..300).contains(&status) {
            let body = if bytes.is_empty() {
                None
            } else {
                Some(serde_json::from_slice(&bytes)?)
            };
            return Ok(Self::from_parts(status, headers, body, None));
        }

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let error_body = ErrorBody::new(content_type, bytes.to_vec());
        Ok(Self::from_parts(status, headers, None, Some(error_body)))
    }
}
