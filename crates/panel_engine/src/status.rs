use std::sync::Arc;
use std::time::Duration;

use panel_core::Msg;
use panel_logging::panel_debug;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{Backend, Panel};

/// Refresh period of the status indicator.
pub const STATUS_INTERVAL: Duration = Duration::from_secs(30);

/// Independent status probe, decoupled from any operation.
pub struct StatusMonitor {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl StatusMonitor {
    /// Probes immediately, then every `interval`.
    pub fn spawn(backend: Arc<dyn Backend>, panel: Panel, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let interval = interval.max(Duration::from_millis(1));
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let status = tokio::select! {
                    _ = token.cancelled() => break,
                    status = backend.status() => status,
                };
                panel_debug!("backend status: {}", status);
                panel.dispatch(Msg::StatusChecked(status));
            }
        });
        Self { cancel, task }
    }

    pub fn stop(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}
