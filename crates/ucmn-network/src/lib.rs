//! Request wrapper for ucmn
//!
//! A [`Request`] wraps a [`NetworkRequest`] implementation and runs it in one
//! of two styles: callback mode with [`Request::execute`], or stream mode with
//! [`Request::as_stream`]. Either way parameters are validated first, results
//! are delivered as [`ResponseEnvelope`]s and [`Request::cancel`] stops the
//! latest invocation.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use futures::StreamExt;
//! use serde::Deserialize;
//! use ucmn_network::{
//!     call_stream, EnvelopeStream, HttpClient, NetworkRequest, Request, TransportCall,
//! };
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     id: u64,
//! }
//!
//! struct GetUser {
//!     client: HttpClient,
//!     id: u64,
//! }
//!
//! impl NetworkRequest<User> for GetUser {
//!     fn validate(&self) -> bool {
//!         self.id > 0
//!     }
//!
//!     fn transport_call(&self) -> Arc<dyn TransportCall<User>> {
//!         let url = format!("https://api.example.com/users/{}", self.id);
//!         Arc::new(self.client.get(&url).call::<User>())
//!     }
//!
//!     fn stream(&self) -> Option<EnvelopeStream<User>> {
//!         Some(call_stream(self.transport_call()))
//!     }
//! }
//!
//! # async fn run() {
//! let mut request = Request::new(GetUser {
//!     client: HttpClient::new(),
//!     id: 1,
//! });
//!
//! let mut stream = request.as_stream();
//! if let Some(Ok(envelope)) = stream.next().await {
//!     if envelope.is_successful() {
//!         println!("user {:?}", envelope.body());
//!     }
//! }
//! # }
//! ```

mod callback;
mod envelope;
mod error;
mod request;
mod stream;
mod test_utils;

pub use callback::{bad_request_response, callback_fn, Callback, EnvelopeCallback, FnCallback};
pub use envelope::ResponseEnvelope;
pub use error::RequestError;
pub use request::{InvocationMode, NetworkRequest, Request};
pub use stream::{
    call_stream, EnvelopeResult, EnvelopeStream, Observer, RequestStream, Subscription,
};
pub use ucmn_http::{
    ErrorBody, HttpCall, HttpClient, HttpError, HttpResponse, TransportCall, TransportCallback,
};
