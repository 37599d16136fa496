//! Error types for the request engine.
//!
//! # Design
//! Every error that ends a request is terminal: the engine turns it into a
//! single `FailureOutcome` whose reason is the error's `Display` text. The
//! enums below are therefore split by where the failure happens (acquiring a
//! transport handle, performing an attempt, handing work to a worker) rather
//! than by how a caller might recover.

use thiserror::Error;

/// Reason text delivered when no transport handle could be acquired.
pub const INIT_FAILURE_REASON: &str = "Failed to init transport handle!";

/// The transport could not produce a handle for a new request. The detail
/// is logged; the delivered reason is always `INIT_FAILURE_REASON`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport handle unavailable: {0}")]
pub struct InitError(pub String);

/// A single attempt (or the redirect chain as a whole) failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// DNS, connect, TLS, write, read or protocol failure reported by the
    /// underlying client.
    #[error("{0}")]
    Transport(String),

    /// The response body could not be read to completion.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The server sent a `Location` that cannot be resolved to a URL.
    #[error("invalid redirect target '{location}': {reason}")]
    InvalidRedirect { location: String, reason: String },

    /// The redirect chain grew past the configured cap.
    #[error("too many redirects (limit {limit})")]
    TooManyRedirects { limit: u32 },
}

/// The request could not be handed to a worker thread.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to spawn request worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// The consuming side of the result queue has been dropped.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("result queue is closed")]
pub struct QueueClosed;

/// A method name outside the supported set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

/// Client configuration could not be parsed.
#[derive(Debug, Error)]
#[error("invalid client configuration: {0}")]
pub struct ConfigError(#[from] serde_json::Error);
