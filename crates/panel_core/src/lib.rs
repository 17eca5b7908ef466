//! Panel core: log buffer, progress, button gating and the pure operation
//! state machine.
mod effect;
pub mod gate;
mod log_store;
mod msg;
mod operation;
mod progress;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use gate::{ButtonId, ButtonSet};
pub use log_store::{
    local_time, Clock, LogEntry, LogLevel, LogOrigin, LogStore, RemoteLog, CLEAR_ANNOUNCEMENT,
};
pub use msg::Msg;
pub use operation::{
    file_name_from_url, truncate_excerpt, Epoch, Field, OccurrenceDetail, OccurrenceReport,
    OperationKind, OperationOutcome, OperationPhase, SearchContext, SimulatedStep, SuccessReport,
    ValidatedContext, ValidationError, DEFAULT_ARCHIVE_URL, EXCERPT_LIMIT,
};
pub use progress::{ProgressController, ProgressState, AWAITING_COMMAND};
pub use state::{Dirty, PanelState};
pub use status::ServerStatus;
pub use update::update;
pub use view_model::{PanelSummary, PanelViewModel};
