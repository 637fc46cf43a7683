use std::error::Error as StdError;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use reqwest::multipart::{Form, Part};
use reqwest::Body;

use crate::{
    EngineEvent, FailureKind, Stage, SubmissionId, SubmissionProgress, SubmitError, UploadFile,
    UploadRequest,
};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/process";

const FILES_FIELD: &str = "files";
const PERSONA_FIELD: &str = "persona";
const JOB_FIELD: &str = "job_to_be_done";

/// Timeouts are unset by default: a hung backend keeps the submission in flight.
#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub endpoint: String,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(
        &self,
        submission_id: SubmissionId,
        request: UploadRequest,
        sink: &dyn ProgressSink,
    ) -> Result<serde_json::Value, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    settings: SubmitSettings,
}

impl ReqwestSubmitter {
    pub fn new(settings: SubmitSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SubmitSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, SubmitError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| SubmitError::new(FailureKind::Network, describe(&err)))
    }

    fn endpoint(&self) -> Result<reqwest::Url, SubmitError> {
        let url = reqwest::Url::parse(&self.settings.endpoint).map_err(|err| {
            SubmitError::new(
                FailureKind::InvalidEndpoint,
                format!("invalid endpoint {:?}: {err}", self.settings.endpoint),
            )
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SubmitError::new(
                FailureKind::InvalidEndpoint,
                format!("unsupported endpoint scheme {other:?}"),
            )),
        }
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(
        &self,
        submission_id: SubmissionId,
        request: UploadRequest,
        sink: &dyn ProgressSink,
    ) -> Result<serde_json::Value, SubmitError> {
        let endpoint = self.endpoint()?;
        let client = self.build_client()?;

        emit_stage(sink, submission_id, Stage::Encoding);
        let file_count = request.files.len();
        let form = build_form(request)?;

        emit_stage(sink, submission_id, Stage::Uploading);
        engine_info!(
            "Submitting submission_id={} files={} endpoint={}",
            submission_id,
            file_count,
            endpoint
        );
        let response = client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        emit_stage(sink, submission_id, Stage::Reading);
        let status = response.status();
        let body = response.bytes().await;

        if !status.is_success() {
            let message = match body {
                Ok(body) => http_error_message(status.as_u16(), &body),
                Err(err) => {
                    engine_debug!("Failed to read error body: {}", describe(&err));
                    generic_http_error(status.as_u16())
                }
            };
            engine_warn!(
                "Submission {} rejected with status {}: {}",
                submission_id,
                status,
                message
            );
            return Err(SubmitError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let body = body.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body).map_err(|err| {
            SubmitError::new(FailureKind::MalformedBody, err.to_string())
        })
    }
}

fn emit_stage(sink: &dyn ProgressSink, submission_id: SubmissionId, stage: Stage) {
    sink.emit(EngineEvent::Progress(SubmissionProgress {
        submission_id,
        stage,
    }));
}

/// One `files` part per upload, in order, then the two text fields.
fn build_form(request: UploadRequest) -> Result<Form, SubmitError> {
    let mut form = Form::new();
    for file in request.files {
        form = form.part(FILES_FIELD, file_part(file)?);
    }
    Ok(form
        .text(PERSONA_FIELD, request.persona)
        .text(JOB_FIELD, request.job_to_be_done))
}

fn file_part(file: UploadFile) -> Result<Part, SubmitError> {
    let mime = if crate::is_pdf_name(&file.name) {
        "application/pdf"
    } else {
        "application/octet-stream"
    };
    let length = file.content.len() as u64;
    Part::stream_with_length(Body::from(file.content), length)
        .file_name(file.name)
        .mime_str(mime)
        .map_err(|err| SubmitError::new(FailureKind::Network, describe(&err)))
}

/// Message for a non-2xx response: the body's `error` string when present,
/// otherwise the generic status text.
pub fn http_error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(serde_json::Value::as_str)
                .filter(|message| !message.is_empty())
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| generic_http_error(status))
}

fn generic_http_error(status: u16) -> String {
    format!("HTTP error! status: {status}")
}

fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Network
    };
    SubmitError::new(kind, describe(&err))
}

/// Joins an error with its sources: `outer: inner: root`.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
