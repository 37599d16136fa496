//! `Transport` implementation backed by `ureq`.
//!
//! # Design
//! Each handle owns its own `ureq::Agent` with automatic redirects turned
//! off and HTTP error statuses treated as data. The engine follows redirects
//! itself, so a 3xx response with a `Location` header is reported back as a
//! redirect target resolved against the URL that produced it.
//!
//! ureq adds no headers of its own (`Accept`, `Accept-Encoding`,
//! `User-Agent`), and is built without its `gzip` feature, so the request
//! carries exactly the descriptor's headers and the response body and
//! headers reach the sink as the server sent them.

use std::collections::BTreeMap;
use std::io::Read;
use std::time::Duration;

use ureq::config::AutoHeaderValue;
use ureq::{Agent, RequestBuilder};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{InitError, TransportError};
use crate::http::HttpMethod;
use crate::transport::{Performed, ResponseSink, Transport, TransportHandle};

const READ_CHUNK: usize = 16 * 1024;

/// Blocking HTTP/1.1 transport.
#[derive(Debug, Clone, Default)]
pub struct UreqTransport {
    connect_timeout: Option<Duration>,
    timeout: Option<Duration>,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            timeout: config.timeout(),
        }
    }
}

impl Transport for UreqTransport {
    type Handle = UreqHandle;

    fn acquire(&self) -> Result<UreqHandle, InitError> {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .user_agent(AutoHeaderValue::None)
            .accept(AutoHeaderValue::None)
            .accept_encoding(AutoHeaderValue::None)
            .timeout_connect(self.connect_timeout)
            .timeout_global(self.timeout)
            .build()
            .new_agent();

        Ok(UreqHandle {
            agent,
            method: HttpMethod::Get,
            url: String::new(),
            headers: Vec::new(),
            body: Vec::new(),
        })
    }
}

/// Per-request handle. Dropping it releases the agent and its connections.
pub struct UreqHandle {
    agent: Agent,
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl TransportHandle for UreqHandle {
    fn configure_method(&mut self, method: HttpMethod) {
        self.method = method;
    }

    fn attach_headers(&mut self, headers: &BTreeMap<String, String>) {
        self.headers = headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
    }

    fn attach_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    fn perform(&mut self, sink: &mut ResponseSink) -> Result<Performed, TransportError> {
        let url = self.url.as_str();
        let body = self.body.as_slice();

        // DELETE and OPTIONS carry a body like POST, which ureq only sends
        // when forced.
        let result = match self.method {
            HttpMethod::Get => self.with_headers(self.agent.get(url)).call(),
            HttpMethod::Head => self.with_headers(self.agent.head(url)).call(),
            HttpMethod::Post => self.with_headers(self.agent.post(url)).send(body),
            HttpMethod::Put => self.with_headers(self.agent.put(url)).send(body),
            HttpMethod::Patch => self.with_headers(self.agent.patch(url)).send(body),
            HttpMethod::Delete => self
                .with_headers(self.agent.delete(url))
                .force_send_body()
                .send(body),
            HttpMethod::Options => self
                .with_headers(self.agent.options(url))
                .force_send_body()
                .send(body),
        };
        let mut response = result.map_err(|err| TransportError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes());
            sink.write_header_line(&format!("{name}: {value}\r\n"));
        }

        if self.method != HttpMethod::Head {
            let mut reader = response.body_mut().as_reader();
            let mut chunk = [0u8; READ_CHUNK];
            loop {
                let n = reader
                    .read(&mut chunk)
                    .map_err(|err| TransportError::Body(err.to_string()))?;
                if n == 0 {
                    break;
                }
                sink.write_body(&chunk[..n]);
            }
        }

        let location = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok());
        let redirect = redirect_target(url, status, location)?;

        Ok(Performed { status, redirect })
    }
}

impl UreqHandle {
    fn with_headers<B>(&self, mut builder: RequestBuilder<B>) -> RequestBuilder<B> {
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }
}

/// Resolve the redirect target of a 3xx response, if it names one.
pub(crate) fn redirect_target(
    current: &str,
    status: u16,
    location: Option<&str>,
) -> Result<Option<String>, TransportError> {
    if !(300..400).contains(&status) {
        return Ok(None);
    }
    let Some(location) = location.filter(|l| !l.is_empty()) else {
        return Ok(None);
    };

    let invalid = |reason: url::ParseError| TransportError::InvalidRedirect {
        location: location.to_string(),
        reason: reason.to_string(),
    };
    let base = Url::parse(current).map_err(invalid)?;
    let target = base.join(location).map_err(invalid)?;
    Ok(Some(target.into()))
}
