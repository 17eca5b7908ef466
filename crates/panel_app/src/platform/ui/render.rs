use std::sync::{Mutex, PoisonError};

use panel_core::{
    ButtonId, ButtonSet, Field, LogEntry, LogLevel, OccurrenceDetail, PanelSummary, ProgressState,
    ServerStatus,
};
use panel_engine::RenderSink;

const BAR_WIDTH: usize = 20;

/// Renders panel changes as lines on stdout.
///
/// The log area is append-only on a terminal, so the sink remembers how
/// much of the current buffer generation it already printed and only writes
/// the tail.
#[derive(Debug, Default)]
pub struct TerminalSink {
    printed: Mutex<PrintedLogs>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrintedLogs {
    pub count: usize,
    pub generation: u64,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSink for TerminalSink {
    fn on_logs_changed(&self, logs: &[LogEntry], generation: u64) {
        let mut printed = self.printed.lock().unwrap_or_else(PoisonError::into_inner);
        let (reset, fresh) = unseen_logs(logs, generation, *printed);
        if reset {
            println!("---------------- log cleared ----------------");
        }
        for entry in fresh {
            println!("{}", format_log_line(entry));
        }
        *printed = PrintedLogs {
            count: logs.len(),
            generation,
        };
    }

    fn on_progress_changed(&self, progress: &ProgressState) {
        println!("{}", format_progress(progress));
    }

    fn on_buttons_changed(&self, enabled: ButtonSet) {
        println!("{}", format_buttons(enabled));
    }

    fn on_summary_changed(&self, summary: &PanelSummary) {
        for line in format_summary(summary) {
            println!("{line}");
        }
    }

    fn on_details_changed(&self, details: &[OccurrenceDetail]) {
        for (index, detail) in details.iter().enumerate() {
            println!("{}", format_detail(index + 1, detail));
        }
    }

    fn on_status_changed(&self, status: ServerStatus) {
        println!("backend: {}", status.label());
    }

    fn on_focus_requested(&self, field: Field) {
        let name = match field {
            Field::Url => "url",
            Field::SearchString => "search text",
        };
        println!("> check the {name}");
    }
}

/// Splits the buffer into the part not printed yet. Returns `true` as the
/// first element when the buffer was cleared since the last render.
pub fn unseen_logs(
    logs: &[LogEntry],
    generation: u64,
    printed: PrintedLogs,
) -> (bool, &[LogEntry]) {
    if generation != printed.generation || printed.count > logs.len() {
        return (true, logs);
    }
    (false, &logs[printed.count..])
}

pub fn format_log_line(entry: &LogEntry) -> String {
    let tag = match entry.level {
        LogLevel::Info => "INFO",
        LogLevel::Success => " OK ",
        LogLevel::Warning => "WARN",
        LogLevel::Error => "FAIL",
    };
    format!("[{}] {} {}", entry.timestamp, tag, entry.message)
}

pub fn format_progress(progress: &ProgressState) -> String {
    let filled = usize::from(progress.percent.min(100)) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}% {}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        progress.percent,
        progress.label
    )
}

pub fn format_buttons(enabled: ButtonSet) -> String {
    let names: Vec<String> = ButtonId::ALL
        .iter()
        .map(|id| {
            if enabled.contains(*id) {
                id.to_string()
            } else {
                format!("({id})")
            }
        })
        .collect();
    format!("actions: {}", names.join(" "))
}

pub fn format_summary(summary: &PanelSummary) -> Vec<String> {
    let mut lines = Vec::with_capacity(4);
    lines.push(format!(
        "last file: {}",
        summary.last_file.as_deref().unwrap_or("-")
    ));
    lines.push(format!("downloads: {}", summary.download_count));
    if let Some(count) = summary.occurrence_count {
        lines.push(format!("occurrences: {count}"));
    }
    if let Some(at) = &summary.last_execution {
        lines.push(format!("last run: {at}"));
    }
    lines
}

pub fn format_detail(index: usize, detail: &OccurrenceDetail) -> String {
    format!(
        "#{index} {} line {} (lines {}-{}, {} in context)\n{}",
        detail.file,
        detail.matched_line,
        detail.line_start,
        detail.line_end,
        detail.context_lines,
        detail.excerpt
    )
}
