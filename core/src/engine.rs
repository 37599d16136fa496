//! Request execution: one worker thread per request, one outcome per request.
//!
//! # Design
//! `run` drives a single request to completion on the calling thread. It
//! configures a transport handle, performs the request, follows redirects by
//! discarding the hop's accumulated response and retrying against the new
//! target, and pushes exactly one outcome. The handle is dropped on every
//! exit path before the outcome is queued.
//!
//! `Client` is the submission side: it moves each request onto its own named
//! worker thread and returns immediately. Workers share nothing but their
//! clone of the `ResultSender`.

use std::sync::Arc;
use std::thread;

use tracing::{debug, debug_span, info, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{SubmitError, TransportError, INIT_FAILURE_REASON};
use crate::http::HttpMethod;
use crate::outcome::{Outcome, SuccessOutcome};
use crate::queue::ResultSender;
use crate::request::{build_url, resolve_body, Callbacks, HttpRequest};
use crate::transport::{ResponseSink, Transport, TransportHandle};
use crate::ureq_transport::UreqTransport;

/// Identifier attached to a submitted request's log span.
pub type RequestId = Uuid;

/// Execute `request` and push its outcome onto `results`.
///
/// Returns `true` when a success outcome was produced and `false` on any
/// failure path. `max_redirects` of `None` follows redirects without limit.
pub fn run<T: Transport + ?Sized>(
    transport: &T,
    request: &HttpRequest,
    max_redirects: Option<u32>,
    results: &ResultSender,
) -> bool {
    debug!("starting to process request");
    let callbacks = request.callbacks();

    let mut handle = match transport.acquire() {
        Ok(handle) => handle,
        Err(err) => {
            warn!(error = %err, "failed to acquire transport handle");
            enqueue(results, Outcome::failure(callbacks, INIT_FAILURE_REASON));
            return false;
        }
    };

    handle.configure_method(request.method());
    if let Some(body) = resolve_body(request) {
        handle.attach_body(body.into_bytes());
    }
    handle.attach_headers(request.headers());

    let mut sink = ResponseSink::default();
    let result = follow(&mut handle, build_url(request), max_redirects, &mut sink);

    let outcome = match result {
        Ok(status) => {
            info!(status, "request successful");
            let (body, headers) = sink.into_parts();
            Outcome::Success(SuccessOutcome {
                callbacks,
                status,
                body,
                headers,
            })
        }
        Err(err) => {
            warn!(error = %err, "request failed");
            Outcome::failure(callbacks, err.to_string())
        }
    };

    debug!("cleaning up");
    drop(handle);

    let succeeded = outcome.is_success();
    enqueue(results, outcome);
    succeeded
}

/// Perform against `url`, following redirects until a final response.
fn follow<H: TransportHandle>(
    handle: &mut H,
    mut url: String,
    max_redirects: Option<u32>,
    sink: &mut ResponseSink,
) -> Result<u16, TransportError> {
    let mut hops = 0u32;
    loop {
        handle.set_url(&url);
        debug!(url = %url, "sending request");

        let performed = handle.perform(sink)?;
        let Some(target) = performed.redirect.filter(|t| !t.is_empty()) else {
            return Ok(performed.status);
        };

        if let Some(limit) = max_redirects {
            if hops >= limit {
                return Err(TransportError::TooManyRedirects { limit });
            }
        }
        hops += 1;
        debug!(status = performed.status, target = %target, hops, "following redirect");
        sink.clear();
        url = target;
    }
}

fn enqueue(results: &ResultSender, outcome: Outcome) {
    if let Err(err) = results.push(outcome) {
        warn!(error = %err, "dropping outcome");
    }
}

/// Submission handle shared by the host.
pub struct Client<T: Transport = UreqTransport> {
    transport: Arc<T>,
    results: ResultSender,
    config: ClientConfig,
}

impl Client<UreqTransport> {
    pub fn new(config: ClientConfig, results: ResultSender) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(transport, config, results)
    }
}

impl<T: Transport + 'static> Client<T> {
    pub fn with_transport(transport: T, config: ClientConfig, results: ResultSender) -> Self {
        Self {
            transport: Arc::new(transport),
            results,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A new request seeded with the configured `User-Agent`.
    pub fn request(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        callbacks: Callbacks,
    ) -> HttpRequest {
        HttpRequest::with_user_agent(method, url, callbacks, &self.config.user_agent)
    }

    /// Hand `request` to a fresh worker thread and return at once. The
    /// outcome shows up on the result queue later.
    pub fn submit(&self, request: HttpRequest) -> Result<RequestId, SubmitError> {
        let id = Uuid::new_v4();
        let transport = Arc::clone(&self.transport);
        let results = self.results.clone();
        let max_redirects = self.config.max_redirects;

        thread::Builder::new()
            .name(format!("chttp-{}", id.simple()))
            .spawn(move || {
                let span = debug_span!("request", %id, method = %request.method());
                let _entered = span.enter();
                run(transport.as_ref(), &request, max_redirects, &results)
            })?;

        debug!(%id, "request submitted");
        Ok(id)
    }
}
