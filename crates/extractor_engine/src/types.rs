use std::fmt;

use bytes::Bytes;
use thiserror::Error;

pub type SubmissionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Encoding,
    Uploading,
    Reading,
}

/// A file as it goes on the wire: original name plus content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub files: Vec<UploadFile>,
    pub persona: String,
    pub job_to_be_done: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionProgress {
    pub submission_id: SubmissionId,
    pub stage: Stage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress(SubmissionProgress),
    SubmissionCompleted {
        submission_id: SubmissionId,
        result: Result<serde_json::Value, SubmitError>,
    },
}

/// Submission failure. `message` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmitError {
    pub kind: FailureKind,
    pub message: String,
}

impl SubmitError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    Network,
    Timeout,
    HttpStatus(u16),
    MalformedBody,
}

impl FailureKind {
    /// Server-reported failures as opposed to transport or parse failures.
    pub fn is_server_reported(&self) -> bool {
        matches!(self, FailureKind::HttpStatus(_))
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::MalformedBody => write!(f, "malformed response body"),
        }
    }
}
