//! Extractor core: pure upload-form state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, SubmissionRequest};
pub use msg::Msg;
pub use state::{AppState, RequestStatus, RequiredField, SelectedFile, Stage, SubmissionId};
pub use update::update;
pub use view_model::{
    format_megabytes, summarize_response, AppViewModel, FileRowView, ResponseSummary,
    SectionRowView,
};
