/// Label shown while no operation is in flight.
pub const AWAITING_COMMAND: &str = "Awaiting command";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    pub percent: u8,
    pub label: String,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            percent: 0,
            label: AWAITING_COMMAND.to_string(),
        }
    }
}

/// Sole owner of the progress indicator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressController {
    state: ProgressState,
}

impl ProgressController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the percent (clamped to 0..=100) and, when given, the label.
    pub fn set(&mut self, percent: i32, label: Option<&str>) {
        self.state.percent = percent.clamp(0, 100) as u8;
        if let Some(label) = label {
            self.state.label = label.to_string();
        }
    }

    pub fn reset(&mut self) {
        self.set(0, Some(AWAITING_COMMAND));
    }

    /// Applies a simulated step. Steps that would move the bar backwards are
    /// ignored so a schedule can never undo real progress.
    pub fn advance(&mut self, percent: u8, label: &str) -> bool {
        let percent = percent.min(100);
        if percent < self.state.percent {
            return false;
        }
        self.state.percent = percent;
        self.state.label = label.to_string();
        true
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }
}
