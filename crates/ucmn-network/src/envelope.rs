//! Response envelope

use ucmn_http::HttpResponse;

use crate::error::RequestError;

/// Uniform view over the outcome of a transport exchange
///
/// An envelope wraps the raw [`HttpResponse`] (if there is one) so callers
/// get the same `body` / `is_successful` / `response` accessors whether the
/// request was executed with a callback or consumed as a stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope<T> {
    response: Option<HttpResponse<T>>,
    cause: Option<RequestError>,
}

impl<T> ResponseEnvelope<T> {
    /// Wrap a completed exchange. Success is decided by the response status.
    pub fn create(response: HttpResponse<T>) -> Self {
        Self {
            response: Some(response),
            cause: None,
        }
    }

    /// Wrap a failed exchange
    pub fn error(response: Option<HttpResponse<T>>, cause: RequestError) -> Self {
        Self {
            response,
            cause: Some(cause),
        }
    }

    /// An envelope with neither response nor cause
    pub fn empty() -> Self {
        Self {
            response: None,
            cause: None,
        }
    }

    /// Decoded body, if a response with a body is present
    pub fn body(&self) -> Option<&T> {
        self.response.as_ref().and_then(HttpResponse::body)
    }

    /// Consume the envelope, returning the decoded body
    pub fn into_body(self) -> Option<T> {
        self.response.and_then(HttpResponse::into_body)
    }

    /// True iff a response is present and its status is 2xx
    pub fn is_successful(&self) -> bool {
        self.response
            .as_ref()
            .is_some_and(HttpResponse::is_success)
    }

    /// Underlying transport response, for headers, status and error body
    pub fn response(&self) -> Option<&HttpResponse<T>> {
        self.response.as_ref()
    }

    /// Consume the envelope, returning the transport response
    pub fn into_response(self) -> Option<HttpResponse<T>> {
        self.response
    }

    /// Status code of the underlying response
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(HttpResponse::status)
    }

    /// Failure recorded with [`ResponseEnvelope::error`]
    pub fn cause(&self) -> Option<&RequestError> {
        self.cause.as_ref()
    }
}

impl<T> Default for ResponseEnvelope<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<HttpResponse<T>> for ResponseEnvelope<T> {
    fn from(response: HttpResponse<T>) -> Self {
        Self::create(response)
    }
}
