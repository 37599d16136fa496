//! Multi-producer, single-consumer hand-off of outcomes.
//!
//! # Design
//! `result_queue` returns the two halves of one channel. `ResultSender` is
//! cloned into every worker; `ResultQueue` stays with the host and is only
//! drained from the host's own thread. `drain` takes `&mut self`, so the
//! borrow checker rules out two concurrent drains.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::QueueClosed;
use crate::outcome::{Outcome, OutcomeHandler};

/// Create a connected sender/queue pair.
pub fn result_queue() -> (ResultSender, ResultQueue) {
    let (tx, rx) = mpsc::channel();
    (ResultSender { tx }, ResultQueue { rx })
}

/// Producer half, cheap to clone and safe to move across threads.
#[derive(Debug, Clone)]
pub struct ResultSender {
    tx: Sender<Outcome>,
}

impl ResultSender {
    /// Move an outcome into the queue. Fails only once the consumer is gone,
    /// in which case the outcome is dropped.
    pub fn push(&self, outcome: Outcome) -> Result<(), QueueClosed> {
        self.tx.send(outcome).map_err(|_| QueueClosed)
    }
}

/// Consumer half, owned by the host.
#[derive(Debug)]
pub struct ResultQueue {
    rx: Receiver<Outcome>,
}

impl ResultQueue {
    /// Take every outcome available right now without blocking.
    pub fn drain(&mut self) -> Vec<Outcome> {
        self.rx.try_iter().collect()
    }

    /// Drain and deliver each outcome to `handler`. Returns how many were
    /// delivered.
    pub fn dispatch<H: OutcomeHandler + ?Sized>(&mut self, handler: &mut H) -> usize {
        let outcomes = self.drain();
        let delivered = outcomes.len();
        for outcome in outcomes {
            outcome.deliver(handler);
        }
        delivered
    }
}
