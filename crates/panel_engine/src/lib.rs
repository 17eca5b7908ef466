//! Panel engine: backend client, timers, log polling and operation execution.
mod backend;
mod panel;
mod polling;
mod runner;
mod schedule;
mod status;
mod types;

pub use backend::{Backend, BackendSettings, ReqwestBackend};
pub use panel::{Panel, RenderSink};
pub use polling::PollingSession;
pub use runner::{
    OperationError, OperationRequest, OperationResult, OperationRunner, RunnerSettings,
};
pub use schedule::{run_simulated_steps, CancelHandle};
pub use status::{StatusMonitor, STATUS_INTERVAL};
pub use types::{
    ActionResponse, BackendError, FailureKind, LogRecord, LogsResponse, OccurrenceRecord,
    ProcessResponse, ProcessResult, VerifyResponse,
};
