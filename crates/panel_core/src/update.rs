use crate::{
    file_name_from_url, Effect, LogLevel, Msg, OperationKind, OperationOutcome, OperationPhase,
    PanelState, SuccessReport, DEFAULT_ARCHIVE_URL,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PanelState, msg: Msg) -> (PanelState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            state.log("System started and ready", LogLevel::Success);
            Vec::new()
        }
        Msg::LogRequested { level, message } => {
            state.log(message, level);
            Vec::new()
        }
        Msg::RemoteLogsFetched(records) => {
            if !records.is_empty() {
                state.logs_mut().merge_remote(records);
            }
            Vec::new()
        }
        Msg::ClearLogsClicked => {
            state.logs_mut().clear();
            vec![Effect::ClearRemoteLogs]
        }
        Msg::LogsPaused => {
            state.logs_mut().pause();
            vec![Effect::PausePolling]
        }
        Msg::LogsResumed => {
            state.logs_mut().resume();
            vec![Effect::ResumePolling]
        }
        Msg::UrlEdited(url) => {
            state.set_url_input(url);
            Vec::new()
        }
        Msg::UrlResetClicked => {
            state.set_url_input(DEFAULT_ARCHIVE_URL.to_string());
            state.log("URL reset to default", LogLevel::Info);
            Vec::new()
        }
        Msg::ValidationFailed(err) => {
            // Validation never touches phase, buttons or polling.
            state.log(format!("✗ {err}"), LogLevel::Error);
            vec![Effect::FocusField(err.field())]
        }
        Msg::OperationStarted { kind } => start_operation(&mut state, kind),
        Msg::SimulatedStep { epoch, step } => {
            if state.is_current(epoch) && state.phase() == OperationPhase::Running {
                state.advance_progress(step.percent, &step.label);
            }
            Vec::new()
        }
        Msg::OperationFinished {
            epoch,
            kind,
            outcome,
        } => {
            if !state.is_current(epoch) || state.phase() != OperationPhase::Running {
                return (state, Vec::new());
            }
            finish_operation(&mut state, epoch, kind, outcome)
        }
        Msg::DetailsDue { epoch } => {
            if state.is_current(epoch) {
                let released = state.release_details();
                if released > 0 {
                    state.log(
                        format!("Occurrence breakdown ready: {released} block(s)"),
                        LogLevel::Info,
                    );
                }
            }
            Vec::new()
        }
        Msg::Settled { epoch } => {
            if !state.is_current(epoch) || state.phase() == OperationPhase::Running {
                return (state, Vec::new());
            }
            // Polling may outlive an earlier operation whose settle went stale.
            state.settle();
            vec![Effect::StopPolling]
        }
        Msg::StatusChecked(status) => {
            state.set_status(status);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_operation(state: &mut PanelState, kind: OperationKind) -> Vec<Effect> {
    if state.phase() == OperationPhase::Running {
        let running = state.current().unwrap_or(kind);
        state.log(
            format!("✗ {kind} refused: {running} is still running"),
            LogLevel::Warning,
        );
        return vec![Effect::StartRefused { kind, running }];
    }

    let epoch = state.begin(kind);
    let initial = kind.start_progress();
    state.set_progress(i32::from(initial.percent), Some(&initial.label));
    state.log(kind.start_message(), LogLevel::Info);
    if kind == OperationKind::ProcessComplete {
        state.clear_details();
    }

    let mut effects = Vec::with_capacity(2);
    if kind.polls_logs() {
        effects.push(Effect::StartPolling);
    }
    let steps = kind.simulated_steps();
    if !steps.is_empty() {
        effects.push(Effect::StartSimulation {
            epoch,
            steps,
            interval: kind.step_interval(),
        });
    }
    effects
}

fn finish_operation(
    state: &mut PanelState,
    epoch: crate::Epoch,
    kind: OperationKind,
    outcome: OperationOutcome,
) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    match outcome {
        OperationOutcome::Succeeded(report) => {
            state.set_progress(100, Some(kind.success_label()));
            state.log(format!("✓ {}", report.message), LogLevel::Success);
            if apply_success(state, kind, report) {
                effects.push(Effect::ScheduleDetails { epoch });
            }
            state.last_execution_now();
            state.set_phase(OperationPhase::Success);
        }
        OperationOutcome::Rejected { message } => {
            state.set_progress(0, Some(kind.failure_label()));
            state.log(format!("✗ Error: {message}"), LogLevel::Error);
            state.set_phase(OperationPhase::Error);
        }
        OperationOutcome::ConnectionFailed { message } => {
            state.set_progress(0, Some("Connection error"));
            state.log(format!("✗ Connection error: {message}"), LogLevel::Error);
            state.set_phase(OperationPhase::Error);
        }
    }
    effects.push(Effect::ScheduleSettle {
        epoch,
        delay: kind.settle_delay(),
    });
    effects
}

/// Folds a successful answer into the summary. Returns `true` when an
/// occurrence breakdown is waiting to be shown.
fn apply_success(state: &mut PanelState, kind: OperationKind, report: SuccessReport) -> bool {
    match kind {
        OperationKind::Verify => {
            if let Some(url) = report.file_url.as_deref() {
                state.log(format!("📁 Full URL: {url}"), LogLevel::Info);
            }
            let file_name = report.file_name.or_else(|| {
                report
                    .file_url
                    .as_deref()
                    .map(|url| file_name_from_url(url).to_string())
            });
            let summary = state.summary_mut();
            if file_name.is_some() {
                summary.last_file = file_name;
            }
            if report.file_url.is_some() {
                summary.last_file_url = report.file_url;
            }
            false
        }
        OperationKind::ProcessComplete => {
            let Some(occurrences) = report.occurrences else {
                state.summary_mut().occurrence_count = Some(0);
                return false;
            };
            if let Some(url) = occurrences.archive_url.as_deref() {
                let summary = state.summary_mut();
                summary.last_file = Some(file_name_from_url(url).to_string());
                summary.last_file_url = Some(url.to_string());
            }
            if !occurrences.text_files.is_empty() {
                state.log(
                    format!("Text files searched: {}", occurrences.text_files.join(", ")),
                    LogLevel::Info,
                );
            }
            state.summary_mut().occurrence_count = Some(occurrences.total);
            let has_details = !occurrences.details.is_empty();
            state.hold_details(occurrences.details);
            has_details
        }
        OperationKind::Download => {
            state.summary_mut().download_count += 1;
            false
        }
        OperationKind::Read => false,
    }
}
