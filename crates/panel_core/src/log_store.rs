use std::fmt;

/// Message written after the buffer is cleared.
pub const CLEAR_ANNOUNCEMENT: &str = "Logs cleared - system ready for a new operation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Maps a server-side level name onto a display level. Unknown names fall
    /// back to `Info`.
    pub fn from_wire(level: &str) -> Self {
        match level.trim().to_ascii_lowercase().as_str() {
            "success" => LogLevel::Success,
            "warning" | "warn" => LogLevel::Warning,
            "error" | "critical" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogOrigin {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub origin: LogOrigin,
}

/// A log line as reported by the backend, before it is merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLog {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

impl RemoteLog {
    pub fn new(timestamp: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            level,
            message: message.into(),
        }
    }
}

/// Source of local timestamps.
#[derive(Clone, Copy)]
pub struct Clock(fn() -> String);

impl Clock {
    pub fn new(now: fn() -> String) -> Self {
        Self(now)
    }

    pub fn now(&self) -> String {
        (self.0)()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self(local_time)
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Clock")
    }
}

// Clocks are not part of observable state.
impl PartialEq for Clock {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Clock {}

/// Current wall-clock time formatted for display.
pub fn local_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Ordered, append-only log buffer.
///
/// Remote entries are deduplicated on merge: a candidate is dropped when the
/// message of any remote entry already in the buffer contains it. Local
/// entries never take part in that check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogStore {
    entries: Vec<LogEntry>,
    /// Bumped on every clear.
    generation: u64,
    paused: bool,
    clock: Clock,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Appends a local entry stamped with the current time. Returns `false`
    /// when the store is paused and the entry was dropped.
    pub fn append(&mut self, message: impl Into<String>, level: LogLevel) -> bool {
        if self.paused {
            return false;
        }
        self.push_local(message.into(), level);
        true
    }

    /// Merges backend log lines in order, skipping duplicates. Returns the
    /// number of entries appended.
    pub fn merge_remote<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = RemoteLog>,
    {
        if self.paused {
            return 0;
        }
        let mut appended = 0;
        for record in records {
            if self.is_remote_duplicate(&record.message) {
                continue;
            }
            self.entries.push(LogEntry {
                timestamp: record.timestamp,
                level: record.level,
                message: record.message,
                origin: LogOrigin::Remote,
            });
            appended += 1;
        }
        appended
    }

    /// Empties the buffer and leaves a single reset announcement, even while
    /// paused.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
        self.push_local(CLEAR_ANNOUNCEMENT.to_string(), LogLevel::Info);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of times the buffer has been cleared. Entries printed under an
    /// older generation are gone.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push_local(&mut self, message: String, level: LogLevel) {
        self.entries.push(LogEntry {
            timestamp: self.clock.now(),
            level,
            message,
            origin: LogOrigin::Local,
        });
    }

    fn is_remote_duplicate(&self, candidate: &str) -> bool {
        self.entries
            .iter()
            .filter(|entry| entry.origin == LogOrigin::Remote)
            .any(|entry| entry.message.contains(candidate))
    }
}
