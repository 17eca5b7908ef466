use std::time::Duration;

use panel_core::SimulatedStep;
use tokio_util::sync::CancellationToken;

/// Cancels a scheduled task. Cancelling is synchronous and idempotent; work
/// already applied is not undone.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Applies one step every `interval`, starting one interval from now.
/// The task ends after the last step or when the handle is cancelled.
pub fn run_simulated_steps<F>(
    steps: Vec<SimulatedStep>,
    interval: Duration,
    mut apply: F,
) -> CancelHandle
where
    F: FnMut(SimulatedStep) + Send + 'static,
{
    let handle = CancelHandle::default();
    let token = handle.token.clone();
    tokio::spawn(async move {
        for step in steps {
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(interval) => {}
            }
            if token.is_cancelled() {
                return;
            }
            apply(step);
        }
    });
    handle
}
