//! Asynchronous HTTP request engine for single-threaded hosts.
//!
//! # Overview
//! A host describes a request (`HttpRequest`), submits it through a
//! `Client`, and keeps running. A worker thread performs the blocking
//! network call, follows redirects, and pushes one `Outcome` onto the
//! result queue. The host drains the queue from its own thread and invokes
//! the callback named in each outcome.
//!
//! # Design
//! - The result queue is created explicitly with `result_queue` and owned by
//!   the host; workers only hold a `ResultSender`.
//! - Callback handles are plain integers. Only the consumer ever turns them
//!   back into host calls.
//! - The network primitive sits behind the `Transport` trait; `UreqTransport`
//!   is the production implementation and tests substitute stubs.

pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod outcome;
pub mod queue;
pub mod request;
pub mod transport;
pub mod ureq_transport;

pub use config::ClientConfig;
pub use engine::{run, Client, RequestId};
pub use error::{InitError, QueueClosed, SubmitError, TransportError, UnknownMethod};
pub use http::HttpMethod;
pub use outcome::{FailureOutcome, Outcome, OutcomeHandler, SuccessOutcome};
pub use queue::{result_queue, ResultQueue, ResultSender};
pub use request::{
    build_query_string, build_url, resolve_body, CallbackHandle, Callbacks, HttpRequest,
};
pub use transport::{parse_header_line, Performed, ResponseSink, Transport, TransportHandle};
pub use ureq_transport::UreqTransport;
