//! Extractor engine: file loading, multipart submission and response persistence.
mod engine;
mod persist;
mod selection;
mod submit;
mod types;

pub use engine::{EngineError, EngineHandle};
pub use persist::{
    ensure_output_dir, response_filename, write_response, AtomicFileWriter, PersistError,
};
pub use selection::{is_pdf_name, load_selection, SelectionError};
pub use submit::{
    http_error_message, ChannelProgressSink, ProgressSink, ReqwestSubmitter, SubmitSettings,
    Submitter, DEFAULT_ENDPOINT,
};
pub use types::{
    EngineEvent, FailureKind, Stage, SubmissionId, SubmissionProgress, SubmitError, UploadFile,
    UploadRequest,
};
