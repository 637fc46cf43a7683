use crate::{SelectedFile, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send one multipart submission to the processing endpoint.
    Submit {
        submission_id: SubmissionId,
        request: SubmissionRequest,
    },
}

/// Everything the engine needs to build the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub files: Vec<SelectedFile>,
    pub persona: String,
    pub job_to_be_done: String,
}
