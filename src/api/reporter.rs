//! Background delivery of stat deltas.
//!
//! `report` only queues the delta; a single worker thread posts them in
//! order. A failed post is logged and dropped, never retried. Dropping the
//! reporter waits for the queued deltas to be attempted, so closing the
//! window doesn't lose them.

use super::StatSink;
use crate::error::ApiError;
use crate::models::StatDelta;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

pub struct StatReporter {
    sender: Option<Sender<StatDelta>>,
    worker: Option<JoinHandle<()>>,
}

impl StatReporter {
    /// Starts the worker. `deliver` performs one blocking post.
    pub fn spawn<F>(deliver: F) -> Self
    where
        F: Fn(&StatDelta) -> Result<(), ApiError> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<StatDelta>();

        let worker = thread::spawn(move || {
            for delta in receiver {
                match deliver(&delta) {
                    Ok(()) => log::debug!(
                        "stat sent for card {} (shown +{}, correct +{})",
                        delta.id,
                        delta.shown_delta,
                        delta.correct_delta
                    ),
                    Err(e) => log::warn!("dropping stat for card {}: {}", delta.id, e),
                }
            }
        });

        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }
}

impl Drop for StatReporter {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop once the queue is empty
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("stat reporter thread panicked");
            }
        }
    }
}

impl StatSink for StatReporter {
    fn report(&self, delta: StatDelta) {
        let Some(sender) = &self.sender else {
            return;
        };
        if let Err(mpsc::SendError(delta)) = sender.send(delta) {
            log::warn!("stat reporter is gone, dropping stat for card {}", delta.id);
        }
    }
}
