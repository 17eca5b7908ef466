use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use panel_core::{Msg, RemoteLog};
use panel_logging::{panel_debug, panel_diagnostic};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{Backend, Panel};

struct PollerState {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerState {
    fn shutdown(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Periodic `/api/logs` fetch feeding the panel's log store.
///
/// At most one loop is live: starting a session cancels the previous one
/// before spawning. Ticks are awaited inline and missed ticks are skipped,
/// so fetches never overlap.
#[derive(Default)]
pub struct PollingSession {
    poller: Mutex<Option<PollerState>>,
    paused: Arc<AtomicBool>,
}

impl PollingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts polling with the first fetch on the next scheduler turn.
    pub fn start(&self, backend: Arc<dyn Backend>, panel: Panel, interval: Duration) {
        let mut guard = self.lock();
        if let Some(previous) = guard.take() {
            panel_debug!("log polling restarted");
            previous.shutdown();
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let paused = Arc::clone(&self.paused);
        let interval = interval.max(Duration::from_millis(1));
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                if paused.load(Ordering::Relaxed) {
                    continue;
                }
                let result = tokio::select! {
                    _ = token.cancelled() => break,
                    result = backend.fetch_logs() => result,
                };
                match result {
                    Ok(records) => {
                        let records: Vec<RemoteLog> =
                            records.into_iter().map(RemoteLog::from).collect();
                        panel.dispatch(Msg::RemoteLogsFetched(records));
                    }
                    Err(err) => panel_diagnostic!("log polling fetch failed: {}", err),
                }
            }
        });

        *guard = Some(PollerState { cancel, task });
    }

    /// Stops the loop; a no-op when nothing is running.
    pub fn stop(&self) {
        if let Some(state) = self.lock().take() {
            panel_debug!("log polling stopped");
            state.shutdown();
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn is_active(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|state| !state.task.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<PollerState>> {
        self.poller.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for PollingSession {
    fn drop(&mut self) {
        self.stop();
    }
}
