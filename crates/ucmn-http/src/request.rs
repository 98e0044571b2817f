//! HTTP request builder

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::call::HttpCall;
use crate::error::HttpError;
use crate::response::{HttpResponse, HttpResult};

/// reqwest-based request builder
#[derive(Debug)]
pub struct RequestBuilder {
    inner: reqwest::RequestBuilder,
}

impl RequestBuilder {
    /// Create a new RequestBuilder from a reqwest::RequestBuilder
    pub(crate) fn new(inner: reqwest::RequestBuilder) -> Self {
        Self { inner }
    }

    /// Add a header to the request
    pub fn header(self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        Self {
            inner: self.inner.header(key.as_ref(), value.as_ref()),
        }
    }

    /// Add a bearer token `Authorization` header
    pub fn bearer_auth(self, token: impl std::fmt::Display) -> Self {
        Self {
            inner: self.inner.bearer_auth(token),
        }
    }

    /// Append query parameters to the URL
    pub fn query<T: Serialize + ?Sized>(self, query: &T) -> Self {
        Self {
            inner: self.inner.query(query),
        }
    }

    /// Set the request body as JSON
    pub fn json<T: Serialize + ?Sized>(self, body: &T) -> Self {
        Self {
            inner: self.inner.json(body),
        }
    }

    /// Set the request body as form data
    pub fn form<T: Serialize + ?Sized>(self, body: &T) -> Self {
        Self {
            inner: self.inner.form(body),
        }
    }

    /// Turn the request into a one-shot [`HttpCall`]
    pub fn call<T>(self) -> HttpCall<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        HttpCall::new(self.inner)
    }

    /// Send the request and return the decoded response, whatever its status
    pub async fn send<T: DeserializeOwned>(self) -> HttpResult<HttpResponse<T>> {
        let response = self.inner.send().await.map_err(HttpError::from)?;
        HttpResponse::from_reqwest(response).await
    }

    /// Send the request and deserialize the response as JSON
    ///
    /// Non-2xx statuses become [`HttpError::Status`] carrying the response text.
    pub async fn send_json<R: DeserializeOwned>(self) -> HttpResult<R> {
        let response = self.inner.send().await.map_err(HttpError::from)?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HttpError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(HttpError::from)
    }
}
