#![cfg(test)]
#![allow(missing_docs)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ucmn_http::{HttpError, HttpResponse, TransportCall, TransportCallback};

/// What a [`ScriptedCall`] does when enqueued
pub enum Script<T> {
    /// Complete synchronously with the given response
    Respond(Option<HttpResponse<T>>),
    /// Fail synchronously with the given error
    Fail(HttpError),
    /// Hold on to the callback until canceled
    Hang,
}

/// In-memory transport call that plays back a [`Script`]
pub struct ScriptedCall<T> {
    script: Mutex<Option<Script<T>>>,
    parked: Mutex<Option<Box<dyn TransportCallback<T>>>>,
    executed: AtomicBool,
    canceled: AtomicBool,
    cancels: AtomicUsize,
}

impl<T: Send + 'static> ScriptedCall<T> {
    pub fn new(script: Script<T>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(Some(script)),
            parked: Mutex::new(None),
            executed: AtomicBool::new(false),
            canceled: AtomicBool::new(false),
            cancels: AtomicUsize::new(0),
        })
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    /// Whether a hanging call still holds its callback
    pub fn is_parked(&self) -> bool {
        self.parked.lock().expect("lock").is_some()
    }
}

impl<T: Send + 'static> TransportCall<T> for ScriptedCall<T> {
    fn enqueue(self: Arc<Self>, callback: Box<dyn TransportCallback<T>>) {
        self.executed.store(true, Ordering::SeqCst);
        let script = self.script.lock().expect("lock").take();
        match script {
            Some(Script::Respond(response)) => callback.on_response(&*self, response),
            Some(Script::Fail(error)) => callback.on_failure(&*self, error),
            Some(Script::Hang) => *self.parked.lock().expect("lock") = Some(callback),
            None => callback.on_failure(&*self, HttpError::AlreadyExecuted),
        }
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        self.canceled.store(true, Ordering::SeqCst);

        let parked = self.parked.lock().expect("lock").take();
        if let Some(callback) = parked {
            callback.on_failure(self, HttpError::Canceled);
        }
    }

    fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    fn is_executed(&self) -> bool {
        self.executed.load(Ordering::SeqCst)
    }
}
