//! Transport calls
//!
//! A [`TransportCall`] is a single in-flight request that is submitted
//! asynchronously with [`TransportCall::enqueue`] and reports back through a
//! [`TransportCallback`]. [`HttpCall`] is the reqwest-backed implementation.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::error::HttpError;
use crate::response::{HttpResponse, HttpResult};

/// Receives the outcome of an enqueued [`TransportCall`]
///
/// Exactly one of the two methods is invoked per enqueue.
pub trait TransportCallback<T>: Send {
    /// The call completed. `None` means the transport produced no response.
    fn on_response(self: Box<Self>, call: &dyn TransportCall<T>, response: Option<HttpResponse<T>>);

    /// The call failed before a response was available
    fn on_failure(self: Box<Self>, call: &dyn TransportCall<T>, error: HttpError);
}

/// An HTTP call that can be submitted once and canceled
pub trait TransportCall<T>: Send + Sync {
    /// Submit the call; the outcome is delivered to `callback`, possibly on
    /// another thread
    fn enqueue(self: Arc<Self>, callback: Box<dyn TransportCallback<T>>);

    /// Cancel the call. Canceling a completed or already canceled call does nothing.
    fn cancel(&self);

    /// Whether [`TransportCall::cancel`] has been called
    fn is_canceled(&self) -> bool;

    /// Whether the call has been submitted
    fn is_executed(&self) -> bool;
}

/// One-shot reqwest call producing an [`HttpResponse<T>`]
pub struct HttpCall<T> {
    request: Mutex<Option<reqwest::RequestBuilder>>,
    executed: AtomicBool,
    cancel_token: CancellationToken,
    _body: PhantomData<fn() -> T>,
}

impl<T> Debug for HttpCall<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCall")
            .field("executed", &self.executed.load(Ordering::SeqCst))
            .field("canceled", &self.cancel_token.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl<T> HttpCall<T>
where
    T: DeserializeOwned + Send + 'static,
{
    pub(crate) fn new(request: reqwest::RequestBuilder) -> Self {
        Self {
            request: Mutex::new(Some(request)),
            executed: AtomicBool::new(false),
            cancel_token: CancellationToken::new(),
            _body: PhantomData,
        }
    }

    /// Run the call on the current task and wait for its response
    pub async fn execute(&self) -> HttpResult<HttpResponse<T>> {
        let request = self.take_request()?;

        tokio::select! {
            _ = self.cancel_token.cancelled() => Err(HttpError::Canceled),
            result = async {
                let response = request.send().await.map_err(HttpError::from)?;
                HttpResponse::from_reqwest(response).await
            } => result,
        }
    }

    fn take_request(&self) -> HttpResult<reqwest::RequestBuilder> {
        if self.cancel_token.is_cancelled() {
            return Err(HttpError::Canceled);
        }

        let request = self
            .request
            .lock()
            .map_err(|_| HttpError::Other("call state poisoned".to_string()))?
            .take()
            .ok_or(HttpError::AlreadyExecuted)?;
        self.executed.store(true, Ordering::SeqCst);
        Ok(request)
    }
}

impl<T> TransportCall<T> for HttpCall<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn enqueue(self: Arc<Self>, callback: Box<dyn TransportCallback<T>>) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("Cannot enqueue HTTP call outside a tokio runtime: {}", err);
                callback.on_failure(&*self, HttpError::Other(err.to_string()));
                return;
            }
        };

        runtime.spawn(async move {
            match self.execute().await {
                Ok(response) => {
                    tracing::trace!(status = response.status(), "HTTP call completed");
                    callback.on_response(&*self, Some(response));
                }
                Err(err) => {
                    tracing::debug!("HTTP call failed: {}", err);
                    callback.on_failure(&*self, err);
                }
            }
        });
    }

    fn cancel(&self) {
        if !self.cancel_token.is_cancelled() {
            tracing::debug!("Canceling HTTP call");
            self.cancel_token.cancel();
        }
    }

    fn is_canceled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    fn is_executed(&self) -> bool {
        self.executed.load(Ordering::SeqCst)
    }
}
