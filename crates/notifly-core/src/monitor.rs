// ── Loop supervision ──
//
// Starts one poller task per record kind and owns their handles, so a
// shutdown can wait for in-flight cycles to finish.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::model::RecordKind;
use crate::notify::Notifier;
use crate::poller::Poller;

pub struct Monitor {
    cancel: CancellationToken,
    handles: Vec<(RecordKind, JoinHandle<()>)>,
}

impl Monitor {
    /// Spawn the alarms and events loops.
    pub fn start<N: Notifier + 'static>(poller: &Poller<N>, cancel: CancellationToken) -> Self {
        let handles = RecordKind::ALL
            .into_iter()
            .map(|kind| (kind, poller.spawn(kind, cancel.child_token())))
            .collect();
        info!(sites = poller.settings().sites.len(), "monitor started");
        Self { cancel, handles }
    }

    /// Stop both loops and wait for them to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        self.join().await;
    }

    async fn join(self) {
        for (kind, handle) in self.handles {
            match handle.await {
                Ok(()) => info!(%kind, "checker stopped"),
                Err(e) => warn!(%kind, error = %e, "checker task failed"),
            }
        }
    }
}
