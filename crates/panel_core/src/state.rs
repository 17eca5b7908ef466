use crate::gate;
use crate::view_model::{PanelSummary, PanelViewModel};
use crate::{
    ButtonSet, Clock, Epoch, LogLevel, LogStore, OccurrenceDetail, OperationKind, OperationPhase,
    ProgressController, ServerStatus, DEFAULT_ARCHIVE_URL,
};

/// Areas of the view that changed since the last render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dirty {
    pub logs: bool,
    pub progress: bool,
    pub buttons: bool,
    pub summary: bool,
    pub details: bool,
    pub status: bool,
}

impl Dirty {
    pub fn any(&self) -> bool {
        self.logs || self.progress || self.buttons || self.summary || self.details || self.status
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    logs: LogStore,
    progress: ProgressController,
    phase: OperationPhase,
    current: Option<OperationKind>,
    epoch: Epoch,
    buttons: ButtonSet,
    tertiary_unlocked: bool,
    summary: PanelSummary,
    details: Vec<OccurrenceDetail>,
    pending_details: Vec<OccurrenceDetail>,
    status: ServerStatus,
    url_input: String,
    dirty: Dirty,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            logs: LogStore::new(),
            progress: ProgressController::new(),
            phase: OperationPhase::Idle,
            current: None,
            epoch: 0,
            buttons: gate::compute(OperationPhase::Idle, ButtonSet::all(), false),
            tertiary_unlocked: false,
            summary: PanelSummary::default(),
            details: Vec::new(),
            pending_details: Vec::new(),
            status: ServerStatus::Unknown,
            url_input: DEFAULT_ARCHIVE_URL.to_string(),
            dirty: Dirty::default(),
        }
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose local timestamps come from `clock`.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            logs: LogStore::with_clock(clock),
            ..Self::default()
        }
    }

    pub fn view(&self) -> PanelViewModel {
        PanelViewModel {
            phase: self.phase,
            current: self.current,
            epoch: self.epoch,
            logs: self.logs.entries().to_vec(),
            logs_generation: self.logs.generation(),
            logs_paused: self.logs.is_paused(),
            progress: self.progress.state().clone(),
            buttons: self.buttons,
            summary: self.summary.clone(),
            details: self.details.clone(),
            status: self.status,
            url_input: self.url_input.clone(),
        }
    }

    pub fn logs(&self) -> &LogStore {
        &self.logs
    }

    pub fn phase(&self) -> OperationPhase {
        self.phase
    }

    pub fn current(&self) -> Option<OperationKind> {
        self.current
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn summary(&self) -> &PanelSummary {
        &self.summary
    }

    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.epoch == epoch
    }

    /// Returns and clears the dirty flags.
    pub fn consume_dirty(&mut self) -> Dirty {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn log(&mut self, message: impl Into<String>, level: LogLevel) {
        if self.logs.append(message, level) {
            self.dirty.logs = true;
        }
    }

    pub(crate) fn logs_mut(&mut self) -> &mut LogStore {
        self.dirty.logs = true;
        &mut self.logs
    }

    pub(crate) fn set_progress(&mut self, percent: i32, label: Option<&str>) {
        self.progress.set(percent, label);
        self.dirty.progress = true;
    }

    pub(crate) fn advance_progress(&mut self, percent: u8, label: &str) {
        if self.progress.advance(percent, label) {
            self.dirty.progress = true;
        }
    }

    pub(crate) fn reset_progress(&mut self) {
        self.progress.reset();
        self.dirty.progress = true;
    }

    pub(crate) fn begin(&mut self, kind: OperationKind) -> Epoch {
        self.epoch += 1;
        self.current = Some(kind);
        self.set_phase(OperationPhase::Running);
        self.epoch
    }

    pub(crate) fn set_phase(&mut self, phase: OperationPhase) {
        self.phase = phase;
        if phase == OperationPhase::Success {
            self.tertiary_unlocked = true;
        }
        let relevant = self
            .current
            .map(OperationKind::relevant_buttons)
            .unwrap_or_else(ButtonSet::all);
        self.buttons = gate::compute(phase, relevant, self.tertiary_unlocked);
        self.dirty.buttons = true;
    }

    /// Back to idle without re-gating: buttons keep their post-outcome state.
    pub(crate) fn settle(&mut self) {
        self.phase = OperationPhase::Idle;
        self.current = None;
        self.reset_progress();
    }

    pub(crate) fn summary_mut(&mut self) -> &mut PanelSummary {
        self.dirty.summary = true;
        &mut self.summary
    }

    pub(crate) fn last_execution_now(&mut self) {
        let now = self.logs.clock().now();
        self.summary_mut().last_execution = Some(now);
    }

    pub(crate) fn clear_details(&mut self) {
        self.pending_details.clear();
        if !self.details.is_empty() {
            self.details.clear();
            self.dirty.details = true;
        }
    }

    pub(crate) fn hold_details(&mut self, details: Vec<OccurrenceDetail>) {
        self.pending_details = details;
    }

    /// Moves held details into view. Returns how many were released.
    pub(crate) fn release_details(&mut self) -> usize {
        self.details = std::mem::take(&mut self.pending_details);
        self.dirty.details = true;
        self.details.len()
    }

    pub(crate) fn set_status(&mut self, status: ServerStatus) {
        if self.status != status {
            self.status = status;
            self.dirty.status = true;
        }
    }

    pub(crate) fn set_url_input(&mut self, url: String) {
        self.url_input = url;
    }
}
