//! Outcome records produced by the engine, one per request.
//!
//! Both variants keep both callback handles so the consumer can pick the
//! right one without looking back at the originating request.

use std::collections::BTreeMap;

use crate::request::{CallbackHandle, Callbacks};

/// Final response of a request chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessOutcome {
    pub callbacks: Callbacks,
    pub status: u16,
    /// Raw response body; no charset conversion is applied.
    pub body: Vec<u8>,
    /// Response headers of the final hop, last write wins.
    pub headers: BTreeMap<String, String>,
}

/// A request that ended in an initialization or transport error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureOutcome {
    pub callbacks: Callbacks,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(SuccessOutcome),
    Failure(FailureOutcome),
}

impl Outcome {
    pub fn failure(callbacks: Callbacks, reason: impl Into<String>) -> Self {
        Outcome::Failure(FailureOutcome {
            callbacks,
            reason: reason.into(),
        })
    }

    pub fn callbacks(&self) -> Callbacks {
        match self {
            Outcome::Success(s) => s.callbacks,
            Outcome::Failure(f) => f.callbacks,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Invoke exactly one handler method, matching the variant.
    pub fn deliver<H: OutcomeHandler + ?Sized>(self, handler: &mut H) {
        match self {
            Outcome::Success(s) => {
                handler.on_success(s.callbacks.on_success, s.status, &s.body, &s.headers)
            }
            Outcome::Failure(f) => handler.on_failure(f.callbacks.on_failure, &f.reason),
        }
    }
}

/// Consumer-side sink for delivered outcomes.
///
/// Implementations run on the consumer's own thread and are the only place
/// host callbacks get invoked.
pub trait OutcomeHandler {
    fn on_success(
        &mut self,
        callback: CallbackHandle,
        status: u16,
        body: &[u8],
        headers: &BTreeMap<String, String>,
    );

    fn on_failure(&mut self, callback: CallbackHandle, reason: &str);
}
