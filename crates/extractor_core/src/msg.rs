#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a new set of files; replaces the previous selection.
    FilesSelected(Vec<crate::SelectedFile>),
    /// User edited the persona input.
    PersonaChanged(String),
    /// User edited the job-to-be-done input.
    JobToBeDoneChanged(String),
    /// User pressed "Process Documents".
    SubmitClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Engine progress for a submission.
    SubmissionProgress {
        submission_id: crate::SubmissionId,
        stage: crate::Stage,
    },
    /// Engine completion for a submission. `Err` carries the display message.
    SubmissionDone {
        submission_id: crate::SubmissionId,
        result: Result<serde_json::Value, String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
