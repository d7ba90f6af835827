//! Generic asynchronous web-service request client.
//!
//! A [`RequestClient`] runs at most one HTTP operation at a time on a
//! background execution context, can be cancelled at any moment, decodes the
//! raw response into a typed payload (JSON object, XML document or plain
//! text) and fans the classified outcome out to registered listeners. All
//! listener callbacks for one client are delivered from a single worker task,
//! in a fixed order, so listener code never needs its own synchronization.
//!
//! ```no_run
//! use std::sync::Arc;
//! use webrequest::{JsonRequest, RequestListener};
//!
//! struct Printer;
//!
//! impl RequestListener<serde_json::Value> for Printer {
//!     fn on_success(&self, url: &str, payload: &serde_json::Value) {
//!         println!("{url} -> {payload}");
//!     }
//!     fn on_error(&self, url: &str, code: &str, message: &str) {
//!         eprintln!("{url} failed: {code}: {message}");
//!     }
//! }
//!
//! # async fn run() {
//! let client = JsonRequest::json();
//! client.add_listener(Arc::new(Printer));
//! client.send("https://www.example.com/ws/");
//! # }
//! ```
//!
//! Blocking one-shot requests that bypass the listener machinery live in the
//! [`blocking`] module.

pub mod blocking;
pub mod client;
pub mod config;
pub mod decode;
pub mod errors;
pub mod events;
pub mod net;

pub use client::{JsonRequest, RequestClient, TextRequest, XmlRequest};
pub use config::{RequestBody, RequestConfig, DEFAULT_TIMEOUT, READ_BUFFER_SIZE};
pub use decode::xml::{XmlDocument, XmlElement};
pub use decode::{Decoded, JsonDecoder, ResponseDecoder, TextDecoder, XmlDecoder};
pub use errors::RequestError;
pub use events::RequestListener;

pub use reqwest::Method;
