use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::warn;

use super::record::ArchiveRecord;
use super::store::ArchiveStore;

/// Live, ordered view of the team archive.
///
/// One store subscription per activated instance. The view is rebuilt in
/// full on every change notification and republished through a watch
/// channel; consumers only ever read it. Subscription errors freeze the
/// last-known view rather than clearing it, since stale data is still
/// usable. Dropping the subscription deregisters the listener task.
pub struct ArchiveSubscription {
    view: watch::Receiver<Vec<ArchiveRecord>>,
    task: JoinHandle<()>,
}

impl ArchiveSubscription {
    /// Open the subscription and materialize the initial view.
    pub async fn activate(store: Arc<dyn ArchiveStore>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let (tx, view) = watch::channel(Vec::new());

        // Register for changes before the initial query so no write that
        // lands in between is missed.
        let mut changes = store.changes(&namespace);
        match store.fetch_all(&namespace).await {
            Ok(records) => {
                let _ = tx.send(records);
            }
            Err(err) => warn!(error = %err, %namespace, "initial archive query failed"),
        }

        let task = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        match store.fetch_all(&namespace).await {
                            Ok(records) => {
                                let _ = tx.send(records);
                            }
                            Err(err) => {
                                warn!(error = %err, %namespace, "archive query failed, keeping last view");
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        warn!(%namespace, "archive change stream closed, view frozen");
                        break;
                    }
                }
            }
        });

        Self { view, task }
    }

    /// Snapshot of the current view, newest first.
    pub fn view(&self) -> Vec<ArchiveRecord> {
        self.view.borrow().clone()
    }

    /// Watch the view for changes.
    pub fn watch(&self) -> watch::Receiver<Vec<ArchiveRecord>> {
        self.view.clone()
    }

    /// Close the subscription. Equivalent to dropping it.
    pub fn deactivate(self) {}
}

impl Drop for ArchiveSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
