use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use panel_core::{
    Effect, Epoch, Msg, OperationKind, OperationOutcome, PanelState, SearchContext,
    ValidatedContext, ValidationError,
};
use panel_logging::{panel_diagnostic, panel_info, panel_warn};
use thiserror::Error;

use crate::schedule::{run_simulated_steps, CancelHandle};
use crate::{Backend, Panel, PollingSession};

#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub poll_interval: Duration,
    /// Wait between a successful process-complete answer and the occurrence
    /// breakdown, so trailing polled logs land first.
    pub detail_delay: Duration,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
            detail_delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub kind: OperationKind,
    pub context: SearchContext,
}

impl OperationRequest {
    pub fn verify(url: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Verify,
            context: SearchContext::new(url),
        }
    }

    pub fn process(url: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::ProcessComplete,
            context: SearchContext::new(url).with_search(search),
        }
    }

    /// Downloads the last located file.
    pub fn download() -> Self {
        Self {
            kind: OperationKind::Download,
            context: SearchContext::default(),
        }
    }

    /// Reads the last located file.
    pub fn read() -> Self {
        Self {
            kind: OperationKind::Read,
            context: SearchContext::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("connection error: {0}")]
    Transport(String),
    #[error("{0}")]
    Application(String),
    #[error("{running} is still running")]
    Busy { running: OperationKind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    Succeeded {
        kind: OperationKind,
        message: String,
    },
    Failed {
        kind: OperationKind,
        error: OperationError,
    },
}

impl OperationResult {
    fn from_outcome(kind: OperationKind, outcome: &OperationOutcome) -> Self {
        match outcome {
            OperationOutcome::Succeeded(report) => OperationResult::Succeeded {
                kind,
                message: report.message.clone(),
            },
            OperationOutcome::Rejected { message } => OperationResult::Failed {
                kind,
                error: OperationError::Application(message.clone()),
            },
            OperationOutcome::ConnectionFailed { message } => OperationResult::Failed {
                kind,
                error: OperationError::Transport(message.clone()),
            },
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            OperationResult::Succeeded { kind, .. } | OperationResult::Failed { kind, .. } => *kind,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Succeeded { .. })
    }
}

struct RunnerInner {
    backend: Arc<dyn Backend>,
    panel: Panel,
    polling: PollingSession,
    settings: RunnerSettings,
    simulation: Mutex<Option<(Epoch, CancelHandle)>>,
}

/// Drives operations end to end and executes the effects the panel state
/// machine asks for.
#[derive(Clone)]
pub struct OperationRunner {
    inner: Arc<RunnerInner>,
}

impl OperationRunner {
    pub fn new(backend: Arc<dyn Backend>, panel: Panel, settings: RunnerSettings) -> Self {
        Self {
            inner: Arc::new(RunnerInner {
                backend,
                panel,
                polling: PollingSession::new(),
                settings,
                simulation: Mutex::new(None),
            }),
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.inner.panel
    }

    pub fn polling(&self) -> &PollingSession {
        &self.inner.polling
    }

    /// Dispatches a message and runs the resulting effects.
    pub fn send(&self, msg: Msg) {
        let effects = self.inner.panel.dispatch(msg);
        self.execute(effects);
    }

    /// Runs one operation. Always resolves; failures are reported through
    /// the panel and the returned result. The panel returns to idle after
    /// the operation's settle delay.
    pub async fn invoke(&self, request: OperationRequest) -> OperationResult {
        let kind = request.kind;
        let context = match request.context.validate(kind) {
            Ok(context) => context,
            Err(err) => {
                panel_info!("{} rejected before start: {}", kind, err);
                self.send(Msg::ValidationFailed(err.clone()));
                return OperationResult::Failed {
                    kind,
                    error: err.into(),
                };
            }
        };

        let (effects, (epoch, last_file)) = self.inner.panel.dispatch_then(
            Msg::OperationStarted { kind },
            |state: &PanelState| (state.epoch(), state.summary().last_file.clone()),
        );
        let refused = effects.iter().find_map(|effect| match effect {
            Effect::StartRefused { running, .. } => Some(*running),
            _ => None,
        });
        if let Some(running) = refused {
            panel_info!("{} refused: {} is still running", kind, running);
            return OperationResult::Failed {
                kind,
                error: OperationError::Busy { running },
            };
        }
        panel_info!("{} started (epoch {})", kind, epoch);
        self.execute(effects);

        let outcome = self.call_backend(kind, &context, last_file.as_deref()).await;
        self.cancel_simulation(epoch);

        let result = OperationResult::from_outcome(kind, &outcome);
        panel_info!("{} finished (epoch {}): {:?}", kind, epoch, result);
        self.send(Msg::OperationFinished {
            epoch,
            kind,
            outcome,
        });
        result
    }

    async fn call_backend(
        &self,
        kind: OperationKind,
        context: &ValidatedContext,
        last_file: Option<&str>,
    ) -> OperationOutcome {
        let backend = &self.inner.backend;
        let outcome = match kind {
            OperationKind::Verify => backend
                .verify_largest_zip(&context.url)
                .await
                .map(|response| response.into_outcome()),
            OperationKind::ProcessComplete => {
                let search = context.search_string.as_deref().unwrap_or_default();
                backend
                    .process_complete(&context.url, search)
                    .await
                    .map(|response| response.into_outcome())
            }
            OperationKind::Download => backend
                .download_zip(last_file)
                .await
                .map(|response| response.into_outcome()),
            OperationKind::Read => backend
                .read_content(last_file)
                .await
                .map(|response| response.into_outcome()),
        };
        outcome.unwrap_or_else(|err| {
            panel_warn!("{} request failed: {}", kind, err);
            OperationOutcome::ConnectionFailed {
                message: err.message,
            }
        })
    }

    fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartPolling => self.inner.polling.start(
                    Arc::clone(&self.inner.backend),
                    self.inner.panel.clone(),
                    self.inner.settings.poll_interval,
                ),
                Effect::StopPolling => self.inner.polling.stop(),
                Effect::PausePolling => self.inner.polling.pause(),
                Effect::ResumePolling => self.inner.polling.resume(),
                Effect::StartSimulation {
                    epoch,
                    steps,
                    interval,
                } => self.start_simulation(epoch, steps, interval),
                Effect::ScheduleDetails { epoch } => {
                    self.send_after(self.inner.settings.detail_delay, Msg::DetailsDue { epoch });
                }
                Effect::ScheduleSettle { epoch, delay } => {
                    self.send_after(delay, Msg::Settled { epoch });
                }
                Effect::ClearRemoteLogs => {
                    let backend = Arc::clone(&self.inner.backend);
                    tokio::spawn(async move {
                        if let Err(err) = backend.clear_logs().await {
                            panel_diagnostic!("clearing backend logs failed: {}", err);
                        }
                    });
                }
                Effect::FocusField(field) => self.inner.panel.focus(field),
                Effect::StartRefused { .. } => {}
            }
        }
    }

    fn start_simulation(
        &self,
        epoch: Epoch,
        steps: Vec<panel_core::SimulatedStep>,
        interval: Duration,
    ) {
        let panel = self.inner.panel.clone();
        let handle = run_simulated_steps(steps, interval, move |step| {
            panel.dispatch(Msg::SimulatedStep { epoch, step });
        });
        let previous = self
            .inner
            .simulation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace((epoch, handle));
        if let Some((_, previous)) = previous {
            previous.cancel();
        }
    }

    /// Cancels the simulation started for `epoch`, leaving a newer one alone.
    fn cancel_simulation(&self, epoch: Epoch) {
        let mut slot = self
            .inner
            .simulation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|(owner, _)| *owner == epoch) {
            if let Some((_, handle)) = slot.take() {
                handle.cancel();
            }
        }
    }

    fn send_after(&self, delay: Duration, msg: Msg) {
        let runner = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            runner.send(msg);
        });
    }
}
