use engine_logging::{engine_info, engine_warn};
use extractor_core::{Effect, Msg, SelectedFile, Stage, SubmissionRequest};
use extractor_engine::{EngineEvent, EngineHandle, UploadFile, UploadRequest};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit {
                    submission_id,
                    request,
                } => {
                    engine_info!(
                        "Submit submission_id={} files={} persona_len={} job_len={}",
                        submission_id,
                        request.files.len(),
                        request.persona.len(),
                        request.job_to_be_done.len()
                    );
                    self.engine.submit(submission_id, to_upload_request(request));
                }
            }
        }
    }

    /// Blocks for the next engine event; `None` once the engine is gone.
    pub fn next_msg(&self) -> Option<Msg> {
        self.engine.recv().map(map_event)
    }
}

pub fn to_selected_file(file: UploadFile) -> SelectedFile {
    SelectedFile::new(file.name, file.content)
}

fn to_upload_request(request: SubmissionRequest) -> UploadRequest {
    UploadRequest {
        files: request
            .files
            .into_iter()
            .map(|file| UploadFile::new(file.name, file.content))
            .collect(),
        persona: request.persona,
        job_to_be_done: request.job_to_be_done,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) => Msg::SubmissionProgress {
            submission_id: progress.submission_id,
            stage: map_stage(progress.stage),
        },
        EngineEvent::SubmissionCompleted {
            submission_id,
            result,
        } => Msg::SubmissionDone {
            submission_id,
            result: result.map_err(|err| {
                engine_warn!("Submission {} failed ({}): {}", submission_id, err.kind, err);
                err.message
            }),
        },
    }
}

fn map_stage(stage: extractor_engine::Stage) -> Stage {
    match stage {
        extractor_engine::Stage::Encoding => Stage::Encoding,
        extractor_engine::Stage::Uploading => Stage::Uploading,
        extractor_engine::Stage::Reading => Stage::Reading,
    }
}
