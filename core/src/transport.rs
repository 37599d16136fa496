//! Transport adapter contract.
//!
//! # Design
//! A `Transport` hands out one `TransportHandle` per request. The engine
//! configures the handle once, then calls `perform` for every hop of the
//! redirect chain. Instead of registering callbacks, the engine lends a
//! `ResponseSink` to each `perform`; the handle pushes body chunks and raw
//! header lines into it as they arrive. Dropping the handle releases it.

use std::collections::BTreeMap;

use crate::error::{InitError, TransportError};
use crate::http::HttpMethod;

/// Source of per-request transport handles.
pub trait Transport: Send + Sync {
    type Handle: TransportHandle;

    fn acquire(&self) -> Result<Self::Handle, InitError>;
}

/// One configured, reusable connection to the network for a single request.
pub trait TransportHandle {
    /// HEAD expects no body, POST sends one, PUT/DELETE/PATCH/OPTIONS send
    /// one under a custom verb, GET needs nothing.
    fn configure_method(&mut self, method: HttpMethod);

    /// Replace the outgoing header set.
    fn attach_headers(&mut self, headers: &BTreeMap<String, String>);

    /// Install a fixed-length request body.
    fn attach_body(&mut self, body: Vec<u8>);

    fn set_url(&mut self, url: &str);

    /// Run one synchronous attempt against the current URL.
    fn perform(&mut self, sink: &mut ResponseSink) -> Result<Performed, TransportError>;
}

/// Result of one successful attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Performed {
    pub status: u16,
    /// Absolute URL the server redirected to, if any.
    pub redirect: Option<String>,
}

impl Performed {
    pub fn done(status: u16) -> Self {
        Self {
            status,
            redirect: None,
        }
    }

    pub fn redirect(status: u16, target: impl Into<String>) -> Self {
        Self {
            status,
            redirect: Some(target.into()),
        }
    }
}

/// Accumulates the body and headers of the current hop.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResponseSink {
    body: Vec<u8>,
    headers: BTreeMap<String, String>,
}

impl ResponseSink {
    /// Append one raw body chunk in delivery order.
    pub fn write_body(&mut self, chunk: &[u8]) {
        self.body.extend_from_slice(chunk);
    }

    /// Parse one raw header line and upsert it. Lines without a colon are
    /// dropped.
    pub fn write_header_line(&mut self, line: &str) {
        if let Some((name, value)) = parse_header_line(line) {
            self.headers.insert(name, value);
        }
    }

    /// Forget everything collected so far.
    pub fn clear(&mut self) {
        self.body.clear();
        self.headers.clear();
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn into_parts(self) -> (Vec<u8>, BTreeMap<String, String>) {
        (self.body, self.headers)
    }
}

/// Split a `Name: Value\r\n` line at its first colon.
///
/// The name is taken verbatim. The value loses the single space after the
/// colon and the trailing line terminator. A line without a colon, or
/// without the space after it, yields nothing.
pub fn parse_header_line(line: &str) -> Option<(String, String)> {
    let (name, rest) = line.split_once(':')?;
    let value = rest.strip_prefix(' ')?;
    let value = value
        .strip_suffix("\r\n")
        .or_else(|| value.strip_suffix('\n'))
        .unwrap_or(value);
    Some((name.to_string(), value.to_string()))
}
