use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::ButtonSet;

/// Archive index searched when no URL is supplied.
pub const DEFAULT_ARCHIVE_URL: &str = "https://revistas.inpi.gov.br/rpi/";

/// Context excerpts longer than this many characters are truncated.
pub const EXCERPT_LIMIT: usize = 1000;

/// Generation counter for operations; delayed work from an older epoch is
/// ignored.
pub type Epoch = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Locate the largest archive on the index page.
    Verify,
    /// Locate, download, extract and search in one backend call.
    ProcessComplete,
    /// Download the last located archive.
    Download,
    /// Read the content of the last located archive.
    Read,
}

impl OperationKind {
    pub fn relevant_buttons(self) -> ButtonSet {
        ButtonSet::all()
    }

    /// Whether backend logs are polled while the operation runs.
    pub fn polls_logs(self) -> bool {
        matches!(self, OperationKind::Verify | OperationKind::ProcessComplete)
    }

    /// Wait between the outcome and the return to idle.
    pub fn settle_delay(self) -> Duration {
        match self {
            OperationKind::ProcessComplete => Duration::from_millis(5000),
            OperationKind::Verify | OperationKind::Download | OperationKind::Read => {
                Duration::from_millis(3000)
            }
        }
    }

    pub fn start_message(self) -> &'static str {
        match self {
            OperationKind::Verify => "Starting lookup of the largest ZIP archive...",
            OperationKind::ProcessComplete => "Starting complete processing...",
            OperationKind::Download => "Starting file download...",
            OperationKind::Read => "Starting content read...",
        }
    }

    pub fn start_progress(self) -> SimulatedStep {
        match self {
            OperationKind::Verify => SimulatedStep::new(10, "Connecting to the archive site..."),
            OperationKind::ProcessComplete => {
                SimulatedStep::new(5, "Connecting to the archive site...")
            }
            OperationKind::Download => SimulatedStep::new(20, "Preparing download..."),
            OperationKind::Read => SimulatedStep::new(30, "Reading file content..."),
        }
    }

    /// Fabricated intermediate progress shown while the single backend
    /// response is pending.
    pub fn simulated_steps(self) -> Vec<SimulatedStep> {
        match self {
            OperationKind::Verify => vec![
                SimulatedStep::new(30, "Analyzing available files..."),
                SimulatedStep::new(60, "Processing results..."),
            ],
            OperationKind::ProcessComplete => vec![
                SimulatedStep::new(15, "Locating the largest archive..."),
                SimulatedStep::new(30, "Downloading archive..."),
                SimulatedStep::new(50, "Extracting text files..."),
                SimulatedStep::new(70, "Searching text files..."),
                SimulatedStep::new(85, "Collecting occurrences..."),
            ],
            OperationKind::Download => vec![SimulatedStep::new(60, "Downloading...")],
            OperationKind::Read => Vec::new(),
        }
    }

    pub fn step_interval(self) -> Duration {
        match self {
            OperationKind::Verify => Duration::from_millis(500),
            OperationKind::ProcessComplete => Duration::from_millis(2000),
            OperationKind::Download | OperationKind::Read => Duration::from_millis(700),
        }
    }

    pub fn success_label(self) -> &'static str {
        match self {
            OperationKind::Verify => "Completed successfully!",
            OperationKind::ProcessComplete => "Processing completed!",
            OperationKind::Download => "Download completed!",
            OperationKind::Read => "Read completed!",
        }
    }

    pub fn failure_label(self) -> &'static str {
        match self {
            OperationKind::Verify => "Execution error",
            OperationKind::ProcessComplete => "Processing error",
            OperationKind::Download => "Download error",
            OperationKind::Read => "Read error",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Verify => "verify",
            OperationKind::ProcessComplete => "process-complete",
            OperationKind::Download => "download",
            OperationKind::Read => "read",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperationPhase {
    #[default]
    Idle,
    Running,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedStep {
    pub percent: u8,
    pub label: String,
}

impl SimulatedStep {
    pub fn new(percent: u8, label: impl Into<String>) -> Self {
        Self {
            percent,
            label: label.into(),
        }
    }
}

/// Input field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Url,
    SearchString,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("search string is required")]
    MissingSearchString,
    #[error("invalid archive url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingSearchString => Field::SearchString,
            ValidationError::InvalidUrl { .. } => Field::Url,
        }
    }
}

/// User input an operation starts from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchContext {
    pub url: String,
    pub search_string: Option<String>,
}

/// A `SearchContext` that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContext {
    pub url: String,
    pub search_string: Option<String>,
}

impl SearchContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            search_string: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search_string = Some(search.into());
        self
    }

    /// Checks the context for `kind`. An empty URL resolves to
    /// [`DEFAULT_ARCHIVE_URL`]; the search string is trimmed and required
    /// only for [`OperationKind::ProcessComplete`].
    pub fn validate(&self, kind: OperationKind) -> Result<ValidatedContext, ValidationError> {
        let search_string = self
            .search_string
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(ToOwned::to_owned);
        if kind == OperationKind::ProcessComplete && search_string.is_none() {
            return Err(ValidationError::MissingSearchString);
        }

        let url = match self.url.trim() {
            "" => DEFAULT_ARCHIVE_URL.to_string(),
            raw => raw.to_string(),
        };
        if matches!(kind, OperationKind::Verify | OperationKind::ProcessComplete) {
            url::Url::parse(&url).map_err(|err| ValidationError::InvalidUrl {
                url: url.clone(),
                reason: err.to_string(),
            })?;
        }

        Ok(ValidatedContext { url, search_string })
    }
}

/// Reconciled backend answer for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Succeeded(SuccessReport),
    /// The backend answered `success: false`.
    Rejected { message: String },
    /// The request failed or the body could not be parsed.
    ConnectionFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuccessReport {
    pub message: String,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub occurrences: Option<OccurrenceReport>,
}

impl SuccessReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OccurrenceReport {
    pub archive_url: Option<String>,
    pub total: u64,
    pub text_files: Vec<String>,
    pub details: Vec<OccurrenceDetail>,
}

/// One search hit with its surrounding lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceDetail {
    pub file: String,
    pub matched_line: u64,
    pub context_lines: u64,
    pub line_start: u64,
    pub line_end: u64,
    pub excerpt: String,
}

impl OccurrenceDetail {
    pub fn new(
        file: impl Into<String>,
        matched_line: u64,
        context_lines: u64,
        (line_start, line_end): (u64, u64),
        context: &str,
    ) -> Self {
        Self {
            file: file.into(),
            matched_line,
            context_lines,
            line_start,
            line_end,
            excerpt: truncate_excerpt(context),
        }
    }
}

/// Cuts `text` to [`EXCERPT_LIMIT`] characters and marks the cut with `...`.
pub fn truncate_excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Last path segment of an archive URL.
pub fn file_name_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
