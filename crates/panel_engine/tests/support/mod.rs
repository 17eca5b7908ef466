#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use panel_core::{
    ButtonSet, Clock, Field, LogEntry, OccurrenceDetail, PanelState, PanelSummary, ProgressState,
    ServerStatus,
};
use panel_engine::{
    ActionResponse, Backend, BackendError, FailureKind, LogRecord, OperationRunner, Panel,
    ProcessResponse, RenderSink, RunnerSettings, VerifyResponse,
};

pub fn init_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(panel_logging::initialize_for_tests);
}

/// In-memory backend with scripted answers.
#[derive(Default)]
pub struct FakeBackend {
    pub verify: Mutex<Option<Result<VerifyResponse, BackendError>>>,
    pub process: Mutex<Option<Result<ProcessResponse, BackendError>>>,
    pub action: Mutex<Option<Result<ActionResponse, BackendError>>>,
    pub logs: Mutex<Vec<LogRecord>>,
    pub logs_fail: AtomicBool,
    pub clear_fail: AtomicBool,
    pub status: Mutex<ServerStatus>,
    pub response_delay: Mutex<Duration>,
    pub calls: Mutex<Vec<&'static str>>,
    pub files: Mutex<Vec<Option<String>>>,
    pub log_fetches: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// File arguments received by download and read, in call order.
    pub fn files(&self) -> Vec<Option<String>> {
        self.files.lock().unwrap().clone()
    }

    pub fn log_fetches(&self) -> usize {
        self.log_fetches.load(Ordering::SeqCst)
    }

    pub fn push_log(&self, message: &str) {
        self.logs.lock().unwrap().push(LogRecord {
            timestamp: "2024-01-01 10:00:00".to_string(),
            level: "info".to_string(),
            message: message.to_string(),
        });
    }

    async fn respond<T: Clone>(
        &self,
        name: &'static str,
        slot: &Mutex<Option<Result<T, BackendError>>>,
    ) -> Result<T, BackendError> {
        self.calls.lock().unwrap().push(name);
        let delay = *self.response_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        slot.lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(BackendError::new(FailureKind::Network, "not scripted")))
    }
}

#[async_trait::async_trait]
impl Backend for FakeBackend {
    async fn verify_largest_zip(&self, _url: &str) -> Result<VerifyResponse, BackendError> {
        self.respond("verify", &self.verify).await
    }

    async fn process_complete(
        &self,
        _url: &str,
        _search: &str,
    ) -> Result<ProcessResponse, BackendError> {
        self.respond("process", &self.process).await
    }

    async fn download_zip(&self, file: Option<&str>) -> Result<ActionResponse, BackendError> {
        self.files.lock().unwrap().push(file.map(str::to_string));
        self.respond("download", &self.action).await
    }

    async fn read_content(&self, file: Option<&str>) -> Result<ActionResponse, BackendError> {
        self.files.lock().unwrap().push(file.map(str::to_string));
        self.respond("read", &self.action).await
    }

    async fn fetch_logs(&self) -> Result<Vec<LogRecord>, BackendError> {
        self.log_fetches.fetch_add(1, Ordering::SeqCst);
        if self.logs_fail.load(Ordering::SeqCst) {
            return Err(BackendError::new(FailureKind::Network, "logs unavailable"));
        }
        Ok(self.logs.lock().unwrap().clone())
    }

    async fn clear_logs(&self) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push("clear-logs");
        if self.clear_fail.load(Ordering::SeqCst) {
            return Err(BackendError::new(FailureKind::HttpStatus(500), "boom"));
        }
        self.logs.lock().unwrap().clear();
        Ok(())
    }

    async fn status(&self) -> ServerStatus {
        *self.status.lock().unwrap()
    }
}

/// Sink that records every render.
#[derive(Default)]
pub struct RecordingSink {
    pub logs: Mutex<Vec<LogEntry>>,
    pub progress: Mutex<Vec<ProgressState>>,
    pub buttons: Mutex<Vec<ButtonSet>>,
    pub summary: Mutex<Option<PanelSummary>>,
    pub details: Mutex<Vec<OccurrenceDetail>>,
    pub status: Mutex<Vec<ServerStatus>>,
    pub focus: Mutex<Vec<Field>>,
}

impl RecordingSink {
    pub fn percents(&self) -> Vec<u8> {
        self.progress
            .lock()
            .unwrap()
            .iter()
            .map(|progress| progress.percent)
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }
}

impl RenderSink for RecordingSink {
    fn on_logs_changed(&self, logs: &[LogEntry], _generation: u64) {
        *self.logs.lock().unwrap() = logs.to_vec();
    }

    fn on_progress_changed(&self, progress: &ProgressState) {
        self.progress.lock().unwrap().push(progress.clone());
    }

    fn on_buttons_changed(&self, enabled: ButtonSet) {
        self.buttons.lock().unwrap().push(enabled);
    }

    fn on_summary_changed(&self, summary: &PanelSummary) {
        *self.summary.lock().unwrap() = Some(summary.clone());
    }

    fn on_details_changed(&self, details: &[OccurrenceDetail]) {
        *self.details.lock().unwrap() = details.to_vec();
    }

    fn on_status_changed(&self, status: ServerStatus) {
        self.status.lock().unwrap().push(status);
    }

    fn on_focus_requested(&self, field: Field) {
        self.focus.lock().unwrap().push(field);
    }
}

pub fn test_panel(sink: Arc<RecordingSink>) -> Panel {
    Panel::new(
        PanelState::with_clock(Clock::new(|| "12:00:00".to_string())),
        sink,
    )
}

pub fn test_runner(backend: Arc<FakeBackend>, sink: Arc<RecordingSink>) -> OperationRunner {
    OperationRunner::new(backend, test_panel(sink), RunnerSettings::default())
}

pub async fn advance(duration: Duration) {
    tokio::time::sleep(duration).await;
}
