//! Propagation service that re-applies sinks as the page mutates

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{PageEvent, PageModel};
use crate::tracker::AttributionTracker;

/// Standing subscription over the host's page event feed
///
/// On every event the service re-reads the store and applies the form
/// and embed sinks to the shared page model. It stops when the event
/// channel closes or the handle shuts it down.
pub struct PropagationService {
    tracker: Arc<AttributionTracker>,
    page: Arc<RwLock<PageModel>>,
}

impl PropagationService {
    /// Create a service over the shared page model
    pub fn new(tracker: Arc<AttributionTracker>, page: Arc<RwLock<PageModel>>) -> Self {
        Self { tracker, page }
    }

    /// Start listening; the returned handle cancels the subscription
    pub fn spawn(self, events: broadcast::Receiver<PageEvent>) -> PropagationHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(events, shutdown_rx));
        PropagationHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    async fn run(
        self,
        mut events: broadcast::Receiver<PageEvent>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        info!("PropagationService started");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping PropagationService");
                    break;
                }
                result = events.recv() => match result {
                    Ok(event) => {
                        debug!(?event, "Applying propagation for page event");
                        self.apply().await;
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // Dropped events all trigger the same re-application
                        warn!("PropagationService lagged by {} events", n);
                        self.apply().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("Page event channel closed, stopping PropagationService");
                        break;
                    }
                }
            }
        }
    }

    async fn apply(&self) {
        let mut page = self.page.write().await;
        self.tracker.propagate(&mut page).await;
    }
}

/// Handle over a spawned propagation service
///
/// Dropping the handle aborts the subscription; `shutdown` stops it
/// cleanly and waits for the loop to exit.
pub struct PropagationHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PropagationHandle {
    /// Stop the service and wait for it to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Whether the service loop has exited
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }
}

impl Drop for PropagationHandle {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}
