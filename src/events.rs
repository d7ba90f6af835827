//! Listener contract and event dispatch.
//!
//! A client owns an insertion-ordered registry of listeners. Every lifecycle
//! event walks the registry snapshot taken when the dispatch begins and
//! invokes each listener synchronously, in insertion order, from the client's
//! worker task. A panicking listener is not contained: it aborts the
//! remaining notifications for that event.

use std::sync::{Arc, Mutex};

/// Observer of a request's lifecycle.
///
/// Every callback has a no-op default body, so implementations only override
/// what they care about. Exactly one terminal notification fires per
/// non-superseded operation: `on_complete` followed by `on_success` or
/// `on_error`, or `on_cancel` alone.
pub trait RequestListener<T>: Send + Sync {
    /// Before the request is sent.
    fn on_request(&self, url: &str) {
        let _ = url;
    }

    /// When the request is cancelled, explicitly or by a superseding send.
    fn on_cancel(&self, url: &str) {
        let _ = url;
    }

    /// After the request completed, with or without errors.
    fn on_complete(&self, url: &str) {
        let _ = url;
    }

    /// After the request completed and the payload carried no error signal.
    fn on_success(&self, url: &str, payload: &T) {
        let _ = (url, payload);
    }

    /// On transport failures, or when the payload's error signal is set.
    fn on_error(&self, url: &str, code: &str, message: &str) {
        let _ = (url, code, message);
    }
}

/// Append-only, insertion-ordered listener registry, shared between a client
/// and its worker task.
pub(crate) struct ListenerRegistry<T> {
    listeners: Arc<Mutex<Vec<Arc<dyn RequestListener<T>>>>>,
}

// Manual impl: deriving Clone would put a spurious `T: Clone` bound on it.
impl<T> Clone for ListenerRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<T> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add(&self, listener: Arc<dyn RequestListener<T>>) {
        self.listeners.lock().unwrap().push(listener);
    }

    /// Listeners present when a dispatch begins; later additions are only
    /// observed by subsequent dispatches.
    fn snapshot(&self) -> Vec<Arc<dyn RequestListener<T>>> {
        self.listeners.lock().unwrap().clone()
    }

    pub fn notify_request(&self, url: &str) {
        log::debug!("request started: {url}");
        for listener in self.snapshot() {
            listener.on_request(url);
        }
    }

    pub fn notify_cancel(&self, url: &str) {
        log::debug!("request cancelled: {url}");
        for listener in self.snapshot() {
            listener.on_cancel(url);
        }
    }

    pub fn notify_complete(&self, url: &str) {
        log::debug!("request completed: {url}");
        for listener in self.snapshot() {
            listener.on_complete(url);
        }
    }

    pub fn notify_success(&self, url: &str, payload: &T) {
        for listener in self.snapshot() {
            listener.on_success(url, payload);
        }
    }

    pub fn notify_error(&self, url: &str, code: &str, message: &str) {
        log::warn!("request failed: {url}: {code}: {message}");
        for listener in self.snapshot() {
            listener.on_error(url, code, message);
        }
    }
}
