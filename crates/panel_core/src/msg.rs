#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The panel came up and is ready for commands.
    Started,
    /// Local log line from the front end.
    LogRequested {
        level: crate::LogLevel,
        message: String,
    },
    /// Log lines returned by one polling fetch, in server order.
    RemoteLogsFetched(Vec<crate::RemoteLog>),
    /// User clicked Clear logs.
    ClearLogsClicked,
    /// User paused the log stream.
    LogsPaused,
    /// User resumed the log stream.
    LogsResumed,
    /// User edited the archive URL input.
    UrlEdited(String),
    /// User restored the default archive URL.
    UrlResetClicked,
    /// Pre-flight check rejected an operation request.
    ValidationFailed(crate::ValidationError),
    /// An operation passed validation and is about to contact the backend.
    /// Refused while another operation is running.
    OperationStarted { kind: crate::OperationKind },
    /// Simulated progress step fired.
    SimulatedStep {
        epoch: crate::Epoch,
        step: crate::SimulatedStep,
    },
    /// The backend answered (or failed to answer) an operation.
    OperationFinished {
        epoch: crate::Epoch,
        kind: crate::OperationKind,
        outcome: crate::OperationOutcome,
    },
    /// Detail delay elapsed; occurrence breakdown may be shown.
    DetailsDue { epoch: crate::Epoch },
    /// Settle delay elapsed.
    Settled { epoch: crate::Epoch },
    /// Periodic status probe result.
    StatusChecked(crate::ServerStatus),
    /// Fallback for placeholder wiring.
    NoOp,
}
