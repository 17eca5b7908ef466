use std::fmt;

/// Backend health as shown in the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServerStatus {
    #[default]
    Unknown,
    Online,
    /// The backend answered with a non-2xx status.
    Unstable,
    /// The status request failed.
    Offline,
}

impl ServerStatus {
    pub fn label(self) -> &'static str {
        match self {
            ServerStatus::Unknown => "Checking...",
            ServerStatus::Online => "Online",
            ServerStatus::Unstable => "Instável",
            ServerStatus::Offline => "Offline",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
