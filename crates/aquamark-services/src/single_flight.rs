//! Single-flight execution per rendition key.
//!
//! Duplicate uploads of identical content can race on the same key. The
//! first arrival spawns the work as a detached task and registers a
//! completion channel; later arrivals for the same key subscribe to that
//! channel instead of launching their own invocation. Because the work runs
//! detached, a caller that disconnects mid-request does not kill the
//! external transformation — it runs to completion and populates the cache
//! for future hits.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

/// Terminal result of one in-flight computation, delivered to the leader
/// and every joined waiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightOutcome {
    Completed,
    Failed(String),
}

/// Access-synchronized map from key to in-flight completion signal.
#[derive(Clone, Default)]
pub struct SingleFlight {
    inflight: Arc<Mutex<HashMap<String, broadcast::Sender<FlightOutcome>>>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` for `key`, or join an already-running flight for the
    /// same key and await its outcome.
    pub async fn run<F, Fut>(&self, key: &str, work: F) -> FlightOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        let mut rx = {
            let mut inflight = self.inflight.lock().await;
            if let Some(tx) = inflight.get(key) {
                tracing::debug!(key = %key, "joining in-flight transformation");
                tx.subscribe()
            } else {
                let (tx, rx) = broadcast::channel(1);
                inflight.insert(key.to_string(), tx);

                let this = self.clone();
                let key = key.to_string();
                let fut = work();
                tokio::spawn(async move {
                    let outcome = match fut.await {
                        Ok(()) => FlightOutcome::Completed,
                        Err(reason) => FlightOutcome::Failed(reason),
                    };
                    // Remove before signalling so arrivals that miss the
                    // broadcast start a fresh flight instead of joining a
                    // finished one.
                    let tx = this.inflight.lock().await.remove(&key);
                    if let Some(tx) = tx {
                        let _ = tx.send(outcome);
                    }
                });
                rx
            }
        };

        match rx.recv().await {
            Ok(outcome) => outcome,
            Err(_) => FlightOutcome::Failed("in-flight transformation was abandoned".to_string()),
        }
    }
}
