use crate::{
    ButtonSet, Epoch, LogEntry, OccurrenceDetail, OperationKind, OperationPhase, ProgressState,
    ServerStatus,
};

/// Status fields shown next to the log panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelSummary {
    pub last_file: Option<String>,
    pub last_file_url: Option<String>,
    pub download_count: u32,
    pub occurrence_count: Option<u64>,
    pub last_execution: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelViewModel {
    pub phase: OperationPhase,
    pub current: Option<OperationKind>,
    pub epoch: Epoch,
    pub logs: Vec<LogEntry>,
    pub logs_generation: u64,
    pub logs_paused: bool,
    pub progress: ProgressState,
    pub buttons: ButtonSet,
    pub summary: PanelSummary,
    pub details: Vec<OccurrenceDetail>,
    pub status: ServerStatus,
    pub url_input: String,
}
