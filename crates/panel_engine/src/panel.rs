use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use panel_core::{
    update, ButtonSet, Dirty, Effect, Field, LogEntry, Msg, OccurrenceDetail, PanelState,
    PanelSummary, PanelViewModel, ProgressState, ServerStatus,
};

/// Receives panel state as it changes.
///
/// Callbacks run while the panel is locked so renders arrive in order;
/// implementations must not call back into the [`Panel`].
pub trait RenderSink: Send + Sync {
    /// `generation` changes whenever the buffer was cleared since the
    /// previous call.
    fn on_logs_changed(&self, logs: &[LogEntry], generation: u64);

    fn on_progress_changed(&self, progress: &ProgressState);

    fn on_buttons_changed(&self, enabled: ButtonSet);

    fn on_summary_changed(&self, _summary: &PanelSummary) {}

    fn on_details_changed(&self, _details: &[OccurrenceDetail]) {}

    fn on_status_changed(&self, _status: ServerStatus) {}

    fn on_focus_requested(&self, _field: Field) {}
}

/// Shared handle to the panel state. Every mutation goes through
/// [`Panel::dispatch`], which renders the areas that changed.
#[derive(Clone)]
pub struct Panel {
    state: Arc<Mutex<PanelState>>,
    sink: Arc<dyn RenderSink>,
}

impl Panel {
    pub fn new(state: PanelState, sink: Arc<dyn RenderSink>) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            sink,
        }
    }

    pub fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        self.dispatch_then(msg, |_| ()).0
    }

    /// Dispatches `msg` and reads from the resulting state under the same
    /// lock.
    pub fn dispatch_then<R>(
        &self,
        msg: Msg,
        read: impl FnOnce(&PanelState) -> R,
    ) -> (Vec<Effect>, R) {
        let mut guard = self.lock();
        let state = std::mem::take(&mut *guard);
        let (mut state, effects) = update(state, msg);
        let dirty = state.consume_dirty();
        if dirty.any() {
            self.render(&state.view(), dirty);
        }
        let value = read(&state);
        *guard = state;
        (effects, value)
    }

    pub fn read<R>(&self, read: impl FnOnce(&PanelState) -> R) -> R {
        read(&self.lock())
    }

    pub fn view(&self) -> PanelViewModel {
        self.lock().view()
    }

    pub fn focus(&self, field: Field) {
        self.sink.on_focus_requested(field);
    }

    fn render(&self, view: &PanelViewModel, dirty: Dirty) {
        if dirty.logs {
            self.sink.on_logs_changed(&view.logs, view.logs_generation);
        }
        if dirty.progress {
            self.sink.on_progress_changed(&view.progress);
        }
        if dirty.buttons {
            self.sink.on_buttons_changed(view.buttons);
        }
        if dirty.summary {
            self.sink.on_summary_changed(&view.summary);
        }
        if dirty.details {
            self.sink.on_details_changed(&view.details);
        }
        if dirty.status {
            self.sink.on_status_changed(view.status);
        }
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
