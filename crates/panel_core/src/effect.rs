use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartPolling,
    StopPolling,
    PausePolling,
    ResumePolling,
    StartSimulation {
        epoch: crate::Epoch,
        steps: Vec<crate::SimulatedStep>,
        interval: Duration,
    },
    ScheduleDetails {
        epoch: crate::Epoch,
    },
    ScheduleSettle {
        epoch: crate::Epoch,
        delay: Duration,
    },
    /// Ask the backend to drop its log buffer; the result is not awaited.
    ClearRemoteLogs,
    FocusField(crate::Field),
    /// A start request arrived while `running` was still in flight; nothing
    /// was started.
    StartRefused {
        kind: crate::OperationKind,
        running: crate::OperationKind,
    },
}
