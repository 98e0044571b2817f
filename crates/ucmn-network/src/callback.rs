//! Callback-mode delivery
//!
//! A [`Callback`] receives exactly one terminal outcome per invocation, which
//! is why both methods consume the boxed callback.

use std::fmt::Debug;

use tokio::sync::oneshot;
use ucmn_http::{ErrorBody, HttpError, HttpResponse, TransportCall, TransportCallback};

use crate::envelope::ResponseEnvelope;
use crate::error::RequestError;

/// Caller-facing completion callback
pub trait Callback<T>: Send {
    /// The request completed with a response
    fn on_success(self: Box<Self>, response: ResponseEnvelope<T>);

    /// The request failed validation or the transport failed
    fn on_failure(self: Box<Self>, error: RequestError);
}

/// [`Callback`] built from a pair of closures, see [`callback_fn`]
pub struct FnCallback<S, F> {
    on_success: S,
    on_failure: F,
}

impl<S, F> Debug for FnCallback<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCallback").finish_non_exhaustive()
    }
}

/// Build a [`Callback`] from success and failure closures
pub fn callback_fn<S, F>(on_success: S, on_failure: F) -> FnCallback<S, F> {
    FnCallback {
        on_success,
        on_failure,
    }
}

impl<T, S, F> Callback<T> for FnCallback<S, F>
where
    S: FnOnce(ResponseEnvelope<T>) + Send,
    F: FnOnce(RequestError) + Send,
{
    fn on_success(self: Box<Self>, response: ResponseEnvelope<T>) {
        let this = *self;
        (this.on_success)(response)
    }

    fn on_failure(self: Box<Self>, error: RequestError) {
        let this = *self;
        (this.on_failure)(error)
    }
}

/// Lets async callers await the outcome of `execute`
impl<T: Send> Callback<T> for oneshot::Sender<Result<ResponseEnvelope<T>, RequestError>> {
    fn on_success(self: Box<Self>, response: ResponseEnvelope<T>) {
        if (*self).send(Ok(response)).is_err() {
            tracing::trace!("Response dropped, receiver is gone");
        }
    }

    fn on_failure(self: Box<Self>, error: RequestError) {
        if (*self).send(Err(error)).is_err() {
            tracing::trace!("Failure dropped, receiver is gone");
        }
    }
}

/// Stand-in for a transport completion that carried no response:
/// `400` with an empty JSON object as its error body
pub fn bad_request_response<T>() -> HttpResponse<T> {
    HttpResponse::bad_request(ErrorBody::json("{}"))
}

/// Map a transport completion to the envelope delivered to callers
pub(crate) fn envelope_for<T>(response: Option<HttpResponse<T>>) -> ResponseEnvelope<T> {
    match response {
        Some(response) => ResponseEnvelope::create(response),
        None => {
            tracing::debug!("Transport completed without a response, delivering 400");
            ResponseEnvelope::create(bad_request_response())
        }
    }
}

/// Generic adapter from a transport callback to a caller [`Callback`]
///
/// A completion is always delivered through [`Callback::on_success`], even
/// when the transport produced no response: that case is reported as a
/// synthetic `400` envelope, so callers must check
/// [`ResponseEnvelope::is_successful`]. A transport failure goes to
/// [`Callback::on_failure`] and the call is then canceled, unless the failure
/// is a repeated enqueue: that call still belongs to its first invocation.
pub struct EnvelopeCallback<T> {
    callback: Box<dyn Callback<T>>,
}

impl<T> EnvelopeCallback<T> {
    /// Wrap a caller callback
    pub fn new(callback: Box<dyn Callback<T>>) -> Self {
        Self { callback }
    }
}

impl<T> Debug for EnvelopeCallback<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeCallback").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> TransportCallback<T> for EnvelopeCallback<T> {
    fn on_response(
        self: Box<Self>,
        _call: &dyn TransportCall<T>,
        response: Option<HttpResponse<T>>,
    ) {
        self.callback.on_success(envelope_for(response));
    }

    fn on_failure(self: Box<Self>, call: &dyn TransportCall<T>, error: HttpError) {
        tracing::debug!("Transport failure: {}", error);
        let owns_call = error != HttpError::AlreadyExecuted;
        self.callback.on_failure(RequestError::Transport(error));

        if owns_call && !call.is_canceled() {
            call.cancel();
        }
    }
}
