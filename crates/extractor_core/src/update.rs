use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(files) => {
            state.replace_selection(files);
            Vec::new()
        }
        Msg::PersonaChanged(text) => {
            state.set_persona(text);
            Vec::new()
        }
        Msg::JobToBeDoneChanged(text) => {
            state.set_job_to_be_done(text);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // Disabled, not rejected: a blocked submit leaves state untouched.
            if !state.can_submit() || !state.missing_required_fields().is_empty() {
                return (state, Vec::new());
            }
            let (submission_id, request) = state.begin_submission();
            vec![Effect::Submit {
                submission_id,
                request,
            }]
        }
        Msg::SubmissionProgress {
            submission_id,
            stage,
        } => {
            state.apply_progress(submission_id, stage);
            Vec::new()
        }
        Msg::SubmissionDone {
            submission_id,
            result,
        } => {
            state.apply_done(submission_id, result);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
