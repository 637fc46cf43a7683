use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use thiserror::Error;

use crate::submit::{ChannelProgressSink, ReqwestSubmitter, SubmitSettings, Submitter};
use crate::{EngineEvent, SubmissionId, UploadRequest};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(#[source] io::Error),
}

enum EngineCommand {
    Submit {
        submission_id: SubmissionId,
        request: UploadRequest,
    },
}

/// Runs submissions on a background tokio runtime. Commands go in through
/// [`EngineHandle::submit`]; progress and completions come back as
/// [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: SubmitSettings) -> Result<Self, EngineError> {
        Self::with_submitter(Arc::new(ReqwestSubmitter::new(settings)))
    }

    pub fn with_submitter(submitter: Arc<dyn Submitter>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("extractor-engine-worker")
            .build()
            .map_err(EngineError::Runtime)?;

        thread::Builder::new()
            .name("extractor-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let submitter = submitter.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(submitter.as_ref(), command, event_tx).await;
                    });
                }
                engine_debug!("Engine command channel closed");
            })
            .map_err(EngineError::Thread)?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, submission_id: SubmissionId, request: UploadRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            submission_id,
            request,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event; `None` once the engine is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    submitter: &dyn Submitter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit {
            submission_id,
            request,
        } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = submitter.submit(submission_id, request, &sink).await;
            engine_info!(
                "Submission {} finished: {}",
                submission_id,
                if result.is_ok() { "ok" } else { "error" }
            );
            let _ = event_tx.send(EngineEvent::SubmissionCompleted {
                submission_id,
                result,
            });
        }
    }
}
