use bytes::Bytes;
use serde_json::Value;

use crate::view_model::{summarize_response, AppViewModel, FileRowView};
use crate::SubmissionRequest;

pub type SubmissionId = u64;

/// One entry of the file selection: original name plus the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    InFlight,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Encoding,
    Uploading,
    Reading,
}

/// Text inputs that must be non-empty before a submission starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Persona,
    JobToBeDone,
}

impl RequiredField {
    pub fn label(self) -> &'static str {
        match self {
            RequiredField::Persona => "Persona",
            RequiredField::JobToBeDone => "Job to be Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selection: Vec<SelectedFile>,
    persona: String,
    job_to_be_done: String,
    loading: bool,
    response: Option<Value>,
    error: Option<String>,
    in_flight: Option<SubmissionId>,
    stage: Option<Stage>,
    last_submission_id: SubmissionId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let files = self
            .selection
            .iter()
            .map(|file| FileRowView::new(&file.name, file.size()))
            .collect();
        let selection_label = if self.selection.is_empty() {
            "Click to upload or drag & drop".to_string()
        } else {
            format!("{} file(s) selected", self.selection.len())
        };

        AppViewModel {
            status: self.status(),
            stage: self.stage,
            files,
            selection_label,
            persona: self.persona.clone(),
            job_to_be_done: self.job_to_be_done.clone(),
            missing_fields: self.missing_required_fields(),
            can_submit: self.can_submit(),
            error: self.error.clone(),
            response: self.response.clone(),
            summary: self.response.as_ref().and_then(summarize_response),
            dirty: self.dirty,
        }
    }

    pub fn status(&self) -> RequestStatus {
        if self.loading {
            RequestStatus::InFlight
        } else if self.response.is_some() || self.error.is_some() {
            RequestStatus::Completed
        } else {
            RequestStatus::Idle
        }
    }

    pub fn selection(&self) -> &[SelectedFile] {
        &self.selection
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn job_to_be_done(&self) -> &str {
        &self.job_to_be_done
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Id of the submission currently awaiting a result, if any.
    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    /// Mirrors the submit button's enabled state.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.selection.is_empty()
    }

    pub fn missing_required_fields(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        if self.persona.is_empty() {
            missing.push(RequiredField::Persona);
        }
        if self.job_to_be_done.is_empty() {
            missing.push(RequiredField::JobToBeDone);
        }
        missing
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn replace_selection(&mut self, files: Vec<SelectedFile>) {
        self.selection = files;
        self.mark_dirty();
    }

    pub(crate) fn set_persona(&mut self, text: String) {
        if self.persona != text {
            self.persona = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_job_to_be_done(&mut self, text: String) {
        if self.job_to_be_done != text {
            self.job_to_be_done = text;
            self.mark_dirty();
        }
    }

    /// Moves into the in-flight state and snapshots the request.
    /// Callers check the guards first.
    pub(crate) fn begin_submission(&mut self) -> (SubmissionId, SubmissionRequest) {
        self.response = None;
        self.error = None;
        self.loading = true;
        self.stage = None;
        self.last_submission_id += 1;
        let submission_id = self.last_submission_id;
        self.in_flight = Some(submission_id);
        self.mark_dirty();

        let request = SubmissionRequest {
            files: self.selection.clone(),
            persona: self.persona.clone(),
            job_to_be_done: self.job_to_be_done.clone(),
        };
        (submission_id, request)
    }

    pub(crate) fn apply_progress(&mut self, submission_id: SubmissionId, stage: Stage) {
        if self.in_flight != Some(submission_id) {
            return;
        }
        if self.stage != Some(stage) {
            self.stage = Some(stage);
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_done(
        &mut self,
        submission_id: SubmissionId,
        result: Result<Value, String>,
    ) {
        if self.in_flight != Some(submission_id) {
            return;
        }
        match result {
            Ok(value) => {
                self.response = Some(value);
                self.error = None;
            }
            Err(message) => {
                self.response = None;
                self.error = Some(message);
            }
        }
        self.loading = false;
        self.in_flight = None;
        self.stage = None;
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
