//! Chat capability readiness.
//!
//! Resolves exactly once. After `mark_ready` the flag never reverts and the
//! startup probe task has exited; nothing re-checks availability afterwards.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::llm_client::ChatCapability;

#[derive(Clone)]
pub struct Readiness {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for Readiness {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }

    /// Idempotent. Waiters are woken only on the first call.
    pub fn mark_ready(&self) {
        self.tx.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        });
    }

    /// Returns once the capability is ready; immediately if it already is.
    pub async fn wait_ready(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

/// Probes `chat` every `interval` until it answers, then marks `readiness`
/// and exits for good.
pub fn spawn_readiness_probe(
    readiness: Readiness,
    chat: Arc<dyn ChatCapability>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match chat.probe().await {
                Ok(()) => {
                    debug!("Chat capability answered probe after {attempts} attempt(s)");
                    readiness.mark_ready();
                    return;
                }
                // Log the first failure and then every 100th so a long outage stays visible.
                Err(e) if attempts == 1 || attempts % 100 == 0 => {
                    warn!("Chat capability not ready (attempt {attempts}): {e}");
                }
                Err(_) => {}
            }
            tokio::time::sleep(interval).await;
        }
    })
}
