//! Stream-mode delivery
//!
//! Requests consumed as streams yield `Result<ResponseEnvelope<T>, RequestError>`
//! items. A [`RequestStream`] is tied to a [`Subscription`]; cancelling the
//! subscription ends the stream at its next poll and drops the upstream, which
//! in turn cancels any transport call started by [`call_stream`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::sync::oneshot;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use ucmn_http::{HttpError, TransportCall};

use crate::callback::EnvelopeCallback;
use crate::envelope::ResponseEnvelope;
use crate::error::RequestError;

/// Item yielded by request streams
pub type EnvelopeResult<T> = Result<ResponseEnvelope<T>, RequestError>;

/// Boxed stream of envelopes supplied by a request implementation
pub type EnvelopeStream<T> = Pin<Box<dyn Stream<Item = EnvelopeResult<T>> + Send>>;

/// Cancellation handle for a stream-mode invocation
#[derive(Debug, Clone, Default)]
pub struct Subscription {
    token: CancellationToken,
}

impl Subscription {
    /// Create a new, active subscription
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop delivery. Unsubscribing twice does nothing.
    pub fn unsubscribe(&self) {
        if !self.token.is_cancelled() {
            tracing::debug!("Unsubscribing");
            self.token.cancel();
        }
    }

    /// Whether [`Subscription::unsubscribe`] has been called
    pub fn is_unsubscribed(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Receives the items of a stream driven by [`RequestStream::subscribe`]
pub trait Observer<T>: Send {
    /// Next envelope
    fn on_next(&mut self, response: ResponseEnvelope<T>);

    /// The stream failed; no further calls follow
    fn on_error(&mut self, error: RequestError);

    /// The stream ended normally; no further calls follow
    fn on_completed(&mut self);
}

/// Cancellable stream returned by [`crate::Request::as_stream`]
pub struct RequestStream<T> {
    inner: Option<EnvelopeStream<T>>,
    subscription: Subscription,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
}

impl<T> std::fmt::Debug for RequestStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestStream")
            .field("subscription", &self.subscription)
            .field("terminated", &self.inner.is_none())
            .finish()
    }
}

impl<T: Send + 'static> RequestStream<T> {
    /// Wrap a stream with a fresh subscription
    pub fn new(inner: EnvelopeStream<T>) -> Self {
        Self::with_subscription(inner, Subscription::new())
    }

    /// Wrap a stream, ending it when `subscription` is cancelled
    pub fn with_subscription(inner: EnvelopeStream<T>, subscription: Subscription) -> Self {
        let cancelled = Box::pin(subscription.token.clone().cancelled_owned());
        Self {
            inner: Some(inner),
            subscription,
            cancelled,
        }
    }

    /// A stream that fails once with `error` and ends
    pub fn failed(error: RequestError) -> Self {
        Self::new(futures::stream::once(async move { Err(error) }).boxed())
    }

    /// A stream that ends without yielding anything
    pub fn empty() -> Self {
        Self::new(futures::stream::empty().boxed())
    }

    /// Handle that cancels this stream
    pub fn subscription(&self) -> Subscription {
        self.subscription.clone()
    }

    /// Drive the stream on a spawned task, forwarding items to `observer`
    ///
    /// Returns the subscription that stops delivery. An unsubscribed stream
    /// reports neither [`Observer::on_error`] nor [`Observer::on_completed`].
    /// Outside a tokio runtime the observer gets a single
    /// [`Observer::on_error`] and nothing is polled.
    pub fn subscribe<O>(mut self, mut observer: O) -> Subscription
    where
        O: Observer<T> + 'static,
    {
        let subscription = self.subscription();

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!(
                    "Cannot subscribe to a request stream outside a tokio runtime: {}",
                    err
                );
                observer.on_error(RequestError::Transport(HttpError::Other(err.to_string())));
                return subscription;
            }
        };

        runtime.spawn(async move {
            while let Some(item) = self.next().await {
                match item {
                    Ok(response) => observer.on_next(response),
                    Err(error) => {
                        observer.on_error(error);
                        return;
                    }
                }
            }

            if !self.subscription.is_unsubscribed() {
                observer.on_completed();
            }
        });

        subscription
    }
}

impl<T> Stream for RequestStream<T> {
    type Item = EnvelopeResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.inner.is_none() {
            return Poll::Ready(None);
        }

        if this.cancelled.as_mut().poll(cx).is_ready() {
            tracing::debug!("Request stream cancelled");
            this.inner = None;
            return Poll::Ready(None);
        }

        let polled = match this.inner.as_mut() {
            Some(inner) => inner.as_mut().poll_next(cx),
            None => return Poll::Ready(None),
        };

        if let Poll::Ready(None) = polled {
            this.inner = None;
        }

        polled
    }
}

/// Cancels the call if the stream is dropped before the call completes
struct CancelOnDrop<T> {
    call: Option<Arc<dyn TransportCall<T>>>,
}

impl<T> CancelOnDrop<T> {
    fn disarm(mut self) {
        self.call = None;
    }
}

impl<T> Drop for CancelOnDrop<T> {
    fn drop(&mut self) {
        if let Some(call) = self.call.take() {
            call.cancel();
        }
    }
}

/// Adapt a transport call into a lazy single-item envelope stream
///
/// Nothing is sent until the stream is first polled. The completion is mapped
/// exactly like callback mode, including the synthetic `400` envelope for a
/// completion without a response.
pub fn call_stream<T: Send + 'static>(call: Arc<dyn TransportCall<T>>) -> EnvelopeStream<T> {
    futures::stream::once(async move {
        let (sender, receiver) = oneshot::channel::<EnvelopeResult<T>>();
        let guard = CancelOnDrop {
            call: Some(call.clone()),
        };

        call.enqueue(Box::new(EnvelopeCallback::new(Box::new(sender))));

        let outcome = receiver
            .await
            .unwrap_or(Err(RequestError::Transport(HttpError::Canceled)));
        guard.disarm();
        outcome
    })
    .boxed()
}
