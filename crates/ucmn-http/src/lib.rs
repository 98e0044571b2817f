//! HTTP transport for ucmn
//!
//! This crate wraps reqwest behind a small surface: an [`HttpClient`] that
//! hands out [`RequestBuilder`]s, and one-shot [`HttpCall`]s implementing the
//! [`TransportCall`] trait that the request wrapper in `ucmn-network` drives.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ucmn_http::{HttpClient, HttpCall, TransportCall};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//! }
//!
//! let client = HttpClient::new();
//! let call: Arc<HttpCall<User>> = Arc::new(client.get("https://api.example.com/users/1").call());
//! assert!(!call.is_executed());
//! ```

mod call;
mod client;
mod error;
mod request;
mod response;

pub use call::{HttpCall, TransportCall, TransportCallback};
pub use client::{fetch, HttpClient, HttpClientBuilder};
pub use error::HttpError;
pub use request::RequestBuilder;
pub use reqwest::header::HeaderMap;
pub use response::{ErrorBody, HttpResponse, HttpResult, JSON_CONTENT_TYPE};
