//! Asynchronous request client.
//!
//! A [`RequestClient`] owns at most one in-flight operation. `send()` enqueues
//! a command for the client's worker task, which cancels any predecessor,
//! fires the lifecycle events and spawns the asynchronous round trip.
//! Because one worker task performs every dispatch,
//! events for a single client are totally ordered: `on_request` precedes any
//! terminal event, `on_complete` precedes `on_success`/`on_error`, and a
//! cancelled operation fires `on_cancel` only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Method;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use crate::config::{RequestBody, RequestConfig};
use crate::decode::{Decoded, JsonDecoder, ResponseDecoder, TextDecoder, XmlDecoder};
use crate::errors::RequestError;
use crate::events::{ListenerRegistry, RequestListener};
use crate::net::fetch;

/// Client for a JSON web service.
pub type JsonRequest = RequestClient<JsonDecoder>;

/// Client for an XML web service.
pub type XmlRequest = RequestClient<XmlDecoder>;

/// Client for an endpoint returning plain text.
pub type TextRequest = RequestClient<TextDecoder>;

enum Command {
    Send { url: String, config: RequestConfig },
    Cancel,
}

/// Generic asynchronous web-service client, parameterized by the decoder
/// that turns raw response text into its payload type.
///
/// Configuration mutators return `&mut Self` for chaining and take effect on
/// the next `send()`. Failures never surface from `send()` itself; some
/// terminal listener event always fires exactly once per non-cancelled
/// operation.
pub struct RequestClient<D: ResponseDecoder> {
    config: RequestConfig,
    listeners: ListenerRegistry<D::Payload>,
    running: Arc<AtomicBool>,
    raw_response: Arc<Mutex<Option<String>>>,
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl RequestClient<JsonDecoder> {
    /// Creates a client that decodes responses as JSON objects.
    pub fn json() -> Self {
        Self::new(JsonDecoder)
    }
}

impl RequestClient<XmlDecoder> {
    /// Creates a client that decodes responses as XML documents.
    pub fn xml() -> Self {
        Self::new(XmlDecoder)
    }
}

impl RequestClient<TextDecoder> {
    /// Creates a client that passes response text through unchanged.
    pub fn text() -> Self {
        Self::new(TextDecoder)
    }
}

impl<D: ResponseDecoder> RequestClient<D> {
    /// Creates a client and spawns its worker task.
    ///
    /// Must be called from within a Tokio runtime. The worker exits when the
    /// client is dropped.
    pub fn new(decoder: D) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let listeners = ListenerRegistry::new();
        let running = Arc::new(AtomicBool::new(false));
        let raw_response = Arc::new(Mutex::new(None));

        let worker = Worker {
            cmd_rx,
            decoder,
            listeners: listeners.clone(),
            running: running.clone(),
            raw_response: raw_response.clone(),
            inflight: None,
        };
        tokio::spawn(worker.run());

        Self {
            config: RequestConfig::default(),
            listeners,
            running,
            raw_response,
            cmd_tx,
        }
    }

    /// Registers a listener. Listeners cannot be removed; registration during
    /// an in-flight operation is observed from the next dispatch onwards.
    pub fn add_listener(&self, listener: Arc<dyn RequestListener<D::Payload>>) -> &Self {
        self.listeners.add(listener);
        self
    }

    /// Sets the connect/read timeout for subsequent requests.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.timeout = timeout;
        self
    }

    /// Replaces the request headers.
    pub fn set_request_headers<I>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.config.headers = headers.into_iter().collect();
        self
    }

    /// Sets the request method, GET by default.
    pub fn set_request_method(&mut self, method: Method) -> &mut Self {
        self.config.method = method;
        self
    }

    /// Sets the request body. A GET method is upgraded to POST, mirroring the
    /// usual "a body implies a write" convention; use
    /// [`set_request_method_and_body`](Self::set_request_method_and_body) to
    /// pick the method explicitly.
    pub fn set_request_body(&mut self, body: RequestBody) -> &mut Self {
        self.config.body = Some(body);
        if self.config.method == Method::GET {
            self.config.method = Method::POST;
        }
        self
    }

    /// Sets the request method and body in one call.
    pub fn set_request_method_and_body(&mut self, method: Method, body: RequestBody) -> &mut Self {
        self.set_request_method(method);
        self.set_request_body(body)
    }

    /// Removes all request headers.
    pub fn clear_request_headers(&mut self) -> &mut Self {
        self.config.headers.clear();
        self
    }

    /// Removes the request body. The method is left as is.
    pub fn clear_request_body(&mut self) -> &mut Self {
        self.config.body = None;
        self
    }

    /// Starts (or restarts) an operation on the given URL.
    ///
    /// Never blocks; any in-flight operation is cancelled first and the
    /// outcome is reported exclusively through the listeners.
    pub fn send(&self, url: &str) {
        self.running.store(true, Ordering::SeqCst);
        let command = Command::Send {
            url: url.to_string(),
            config: self.config.clone(),
        };
        if self.cmd_tx.send(command).is_err() {
            // Worker is gone (a listener panicked); nothing will run.
            log::warn!("request worker is gone, dropping send for {url}");
            self.running.store(false, Ordering::SeqCst);
        }
    }

    /// Cancels the in-flight operation, if any. Idempotent, safe while idle,
    /// never blocks the caller on socket teardown.
    pub fn cancel(&self) {
        let _ = self.cmd_tx.send(Command::Cancel);
    }

    /// True from `send()` until the operation's terminal or cancel event.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Last successfully read response body, if any. Retained even when
    /// decoding failed afterwards.
    pub fn raw_response(&self) -> Option<String> {
        self.raw_response.lock().unwrap().clone()
    }
}

struct Inflight {
    url: String,
    join: JoinHandle<Result<String, RequestError>>,
}

struct Worker<D: ResponseDecoder> {
    cmd_rx: mpsc::UnboundedReceiver<Command>,
    decoder: D,
    listeners: ListenerRegistry<D::Payload>,
    running: Arc<AtomicBool>,
    raw_response: Arc<Mutex<Option<String>>>,
    inflight: Option<Inflight>,
}

impl<D: ResponseDecoder> Worker<D> {
    async fn run(mut self) {
        loop {
            tokio::select! {
                // Commands win a race against a completion arriving in the
                // same poll, so a superseding send reliably cancels.
                biased;

                command = self.cmd_rx.recv() => {
                    match command {
                        Some(Command::Send { url, config }) => self.start(url, config),
                        Some(Command::Cancel) => self.cancel_inflight(),
                        None => break, // client dropped
                    }
                }
                result = poll_inflight(&mut self.inflight) => {
                    self.finish(result);
                }
            }
        }

        // Client is gone; tear down any still-running round trip.
        if let Some(op) = self.inflight.take() {
            op.join.abort();
        }
    }

    fn start(&mut self, url: String, config: RequestConfig) {
        self.cancel_inflight();

        self.running.store(true, Ordering::SeqCst);
        self.listeners.notify_request(&url);

        let join = tokio::spawn({
            let url = url.clone();
            async move {
                fetch::fetch_string(
                    &url,
                    &config.headers,
                    &config.method,
                    config.body.as_ref(),
                    config.timeout,
                )
                .await
            }
        });
        self.inflight = Some(Inflight { url, join });
    }

    fn cancel_inflight(&mut self) {
        let Some(op) = self.inflight.take() else {
            return;
        };

        // Aborting drops the in-flight future, which closes the connection;
        // the discarded result means the terminal events are suppressed.
        op.join.abort();
        self.running.store(false, Ordering::SeqCst);
        self.listeners.notify_cancel(&op.url);
    }

    fn finish(&mut self, result: Result<Result<String, RequestError>, JoinError>) {
        let Some(op) = self.inflight.take() else {
            return;
        };
        self.running.store(false, Ordering::SeqCst);

        let outcome = match result {
            Ok(Ok(raw)) => {
                *self.raw_response.lock().unwrap() = Some(raw.clone());
                self.decoder.decode(&raw)
            }
            Ok(Err(e)) => Err(e),
            Err(e) => Err(RequestError::Task(e.to_string())),
        };

        self.listeners.notify_complete(&op.url);
        match outcome {
            Ok(Decoded::Success(payload)) => self.listeners.notify_success(&op.url, &payload),
            Ok(Decoded::BusinessError { code, message }) => {
                self.listeners.notify_error(&op.url, &code, &message)
            }
            Err(e) => self.listeners.notify_error(&op.url, e.code(), &e.to_string()),
        }
    }
}

async fn poll_inflight(
    inflight: &mut Option<Inflight>,
) -> Result<Result<String, RequestError>, JoinError> {
    match inflight {
        Some(op) => (&mut op.join).await,
        None => futures::future::pending().await,
    }
}
