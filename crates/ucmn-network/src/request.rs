//! Request wrapper
//!
//! [`NetworkRequest`] is what a concrete request implements: validation plus
//! factories for the transport call and the stream. [`Request`] wraps an
//! implementation and owns the invocation state, so that [`Request::cancel`]
//! reaches whatever was started last.

use std::fmt;
use std::sync::Arc;

use ucmn_http::{TransportCall, TransportCallback};

use crate::callback::{Callback, EnvelopeCallback};
use crate::envelope::ResponseEnvelope;
use crate::error::RequestError;
use crate::stream::{EnvelopeStream, RequestStream, Subscription};

/// Capabilities a concrete request supplies to [`Request`]
pub trait NetworkRequest<T: Send + 'static> {
    /// Check the request parameters; runs before every invocation
    fn validate(&self) -> bool;

    /// Build the transport call used by [`Request::execute`]
    fn transport_call(&self) -> Arc<dyn TransportCall<T>>;

    /// Build the stream returned by [`Request::as_stream`]; `None` yields an
    /// empty stream
    fn stream(&self) -> Option<EnvelopeStream<T>>;

    /// Translate transport results into envelopes for `callback`
    fn adapt_callback(&self, callback: Box<dyn Callback<T>>) -> Box<dyn TransportCallback<T>> {
        Box::new(EnvelopeCallback::new(callback))
    }

    /// Envelope representing "no response"
    fn empty_response(&self) -> ResponseEnvelope<T> {
        ResponseEnvelope::empty()
    }
}

/// Which entry point a [`Request`] was last invoked through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    /// Not invoked yet
    Uninitialized,
    /// Invoked with [`Request::execute`]
    Callback,
    /// Invoked with [`Request::as_stream`]
    Stream,
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Callback => write!(f, "callback"),
            Self::Stream => write!(f, "stream"),
        }
    }
}

enum Mode<T> {
    Uninitialized,
    Callback(Arc<dyn TransportCall<T>>),
    Stream(Subscription),
}

impl<T> Mode<T> {
    fn kind(&self) -> InvocationMode {
        match self {
            Self::Uninitialized => InvocationMode::Uninitialized,
            Self::Callback(_) => InvocationMode::Callback,
            Self::Stream(_) => InvocationMode::Stream,
        }
    }
}

/// A request that can be executed with a callback or consumed as a stream
///
/// Use one instance per logical request and one invocation style per
/// instance. Invoking the other entry point afterwards works, but only the
/// latest invocation stays reachable through [`Request::cancel`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use ucmn_http::{HttpClient, TransportCall};
/// use ucmn_network::{call_stream, EnvelopeResult, EnvelopeStream, NetworkRequest, Request};
///
/// struct Ping {
///     client: HttpClient,
///     url: String,
/// }
///
/// impl NetworkRequest<serde_json::Value> for Ping {
///     fn validate(&self) -> bool {
///         !self.url.is_empty()
///     }
///
///     fn transport_call(&self) -> Arc<dyn TransportCall<serde_json::Value>> {
///         Arc::new(self.client.get(&self.url).call::<serde_json::Value>())
///     }
///
///     fn stream(&self) -> Option<EnvelopeStream<serde_json::Value>> {
///         Some(call_stream(self.transport_call()))
///     }
/// }
///
/// # async fn run() {
/// let mut request = Request::new(Ping {
///     client: HttpClient::new(),
///     url: "https://api.example.com/ping".to_string(),
/// });
///
/// let (sender, receiver) = tokio::sync::oneshot::channel::<EnvelopeResult<serde_json::Value>>();
/// request.execute(sender);
/// let outcome = receiver.await;
/// # }
/// ```
pub struct Request<R, T> {
    inner: R,
    mode: Mode<T>,
}

impl<R, T> fmt::Debug for Request<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("mode", &self.mode.kind())
            .finish_non_exhaustive()
    }
}

impl<R, T> Request<R, T>
where
    R: NetworkRequest<T>,
    T: Send + 'static,
{
    /// Wrap a request implementation
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            mode: Mode::Uninitialized,
        }
    }

    /// The wrapped implementation
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Unwrap the implementation, dropping any held handle without canceling it
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Current invocation mode
    pub fn mode(&self) -> InvocationMode {
        self.mode.kind()
    }

    /// Validate, then submit the transport call; the outcome goes to `callback`
    ///
    /// A failed validation calls [`Callback::on_failure`] with
    /// [`RequestError::Validation`] before returning and builds no call.
    /// Otherwise this returns as soon as the call is submitted; the callback
    /// may run on another thread.
    pub fn execute<C>(&mut self, callback: C)
    where
        C: Callback<T> + 'static,
    {
        self.execute_boxed(Box::new(callback))
    }

    /// [`Request::execute`] for an already boxed callback
    pub fn execute_boxed(&mut self, callback: Box<dyn Callback<T>>) {
        if !self.inner.validate() {
            tracing::warn!("Request validation failed");
            callback.on_failure(RequestError::Validation);
            return;
        }

        let call = self.inner.transport_call();
        self.enter(Mode::Callback(Arc::clone(&call)));
        let callback = self.inner.adapt_callback(callback);
        call.enqueue(callback);
    }

    /// Validate, then return the request's stream
    ///
    /// A failed validation returns a stream that yields a single
    /// [`RequestError::Validation`] and builds no stream. Nothing is sent
    /// until the returned stream is polled.
    pub fn as_stream(&mut self) -> RequestStream<T> {
        if !self.inner.validate() {
            tracing::warn!("Request validation failed");
            return RequestStream::failed(RequestError::Validation);
        }

        let stream = match self.inner.stream() {
            Some(stream) => RequestStream::new(stream),
            None => RequestStream::empty(),
        };
        self.enter(Mode::Stream(stream.subscription()));
        stream
    }

    /// Cancel the latest invocation
    ///
    /// Cancels the transport call in callback mode, unsubscribes the stream in
    /// stream mode and does nothing before the first invocation.
    pub fn cancel(&self) {
        match &self.mode {
            Mode::Uninitialized => {}
            Mode::Callback(call) => {
                tracing::debug!("Canceling request call");
                call.cancel();
            }
            Mode::Stream(subscription) => {
                tracing::debug!("Canceling request stream");
                subscription.unsubscribe();
            }
        }
    }

    /// Unsubscribe an externally held subscription, whatever the current mode
    pub fn cancel_subscription(&self, subscription: Option<&Subscription>) {
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
    }

    /// Envelope representing "no response", as defined by the implementation
    pub fn empty_response(&self) -> ResponseEnvelope<T> {
        self.inner.empty_response()
    }

    fn enter(&mut self, mode: Mode<T>) {
        let previous = self.mode.kind();
        let next = mode.kind();

        if previous != InvocationMode::Uninitialized && previous != next {
            tracing::warn!(
                %previous,
                %next,
                "Invocation modes mixed on one request, only the latest can be canceled"
            );
        }

        tracing::debug!(mode = %next, "Request invoked");
        self.mode = mode;
    }
}
