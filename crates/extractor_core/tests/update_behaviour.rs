use std::sync::Once;

use extractor_core::{
    update, AppState, Effect, Msg, RequestStatus, RequiredField, SelectedFile, Stage,
    SubmissionRequest,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn pdf(name: &str) -> SelectedFile {
    SelectedFile::new(name, format!("%PDF-1.7 {name}").into_bytes())
}

fn filled_form(files: Vec<SelectedFile>) -> AppState {
    let state = AppState::new();
    let (state, _) = update(state, Msg::FilesSelected(files));
    let (state, _) = update(state, Msg::PersonaChanged("A software developer".into()));
    let (state, _) = update(state, Msg::JobToBeDoneChanged("Find API design".into()));
    state
}

fn submit(state: AppState) -> (AppState, u64) {
    let (state, effects) = update(state, Msg::SubmitClicked);
    let submission_id = match effects.as_slice() {
        [Effect::Submit { submission_id, .. }] => *submission_id,
        other => panic!("expected a single submit effect, got {other:?}"),
    };
    (state, submission_id)
}

#[test]
fn selecting_files_replaces_previous_selection() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::FilesSelected(vec![pdf("a.pdf"), pdf("b.pdf")]));
    let (mut state, effects) = update(state, Msg::FilesSelected(vec![pdf("c.pdf")]));

    assert!(effects.is_empty());
    let names: Vec<_> = state.selection().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["c.pdf"]);
    assert_eq!(state.view().selection_label, "1 file(s) selected");
    assert!(state.consume_dirty());
}

#[test]
fn selecting_same_file_twice_keeps_duplicates() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::FilesSelected(vec![pdf("a.pdf"), pdf("a.pdf")]));

    assert_eq!(state.selection().len(), 2);
}

#[test]
fn submit_emits_effect_with_request_snapshot() {
    init_logging();
    let files = vec![pdf("first.pdf"), pdf("second.pdf")];
    let state = filled_form(files.clone());

    let (state, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(
        effects,
        vec![Effect::Submit {
            submission_id: 1,
            request: SubmissionRequest {
                files,
                persona: "A software developer".to_string(),
                job_to_be_done: "Find API design".to_string(),
            },
        }]
    );
    assert!(state.is_loading());
    assert_eq!(state.status(), RequestStatus::InFlight);
    assert!(!state.view().can_submit);
}

#[test]
fn submit_with_empty_selection_is_noop() {
    init_logging();
    let mut state = filled_form(Vec::new());
    state.consume_dirty();
    let before = state.clone();

    let (mut next, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(next, before);
    assert!(!next.consume_dirty());
    assert!(!next.view().can_submit);
}

#[test]
fn submit_while_in_flight_is_noop() {
    init_logging();
    let state = filled_form(vec![pdf("a.pdf")]);
    let (state, first_id) = submit(state);

    let (state, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(state.in_flight(), Some(first_id));
}

#[test]
fn clearing_selection_while_in_flight_still_blocks_submit() {
    init_logging();
    let state = filled_form(vec![pdf("a.pdf")]);
    let (state, _) = submit(state);
    let (state, _) = update(state, Msg::FilesSelected(Vec::new()));

    let (state, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert!(state.is_loading());
}

#[test]
fn submit_requires_persona_and_job() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::FilesSelected(vec![pdf("a.pdf")]));

    assert_eq!(
        state.view().missing_fields,
        vec![RequiredField::Persona, RequiredField::JobToBeDone]
    );
    // The button is enabled; the required inputs block the submit itself.
    assert!(state.view().can_submit);

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert_eq!(state.status(), RequestStatus::Idle);

    let (state, _) = update(state, Msg::PersonaChanged("Analyst".into()));
    assert_eq!(state.view().missing_fields, vec![RequiredField::JobToBeDone]);
}

#[test]
fn success_sets_response_and_clears_loading() {
    init_logging();
    let state = filled_form(vec![pdf("a.pdf")]);
    let (state, submission_id) = submit(state);

    let payload = json!({"sections": []});
    let (state, effects) = update(
        state,
        Msg::SubmissionDone {
            submission_id,
            result: Ok(payload.clone()),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.is_loading());
    assert_eq!(state.response(), Some(&payload));
    assert_eq!(state.error(), None);
    assert_eq!(state.status(), RequestStatus::Completed);
    assert!(state.view().can_submit);
}

#[test]
fn failure_sets_error_and_clears_loading() {
    init_logging();
    let state = filled_form(vec![pdf("a.pdf")]);
    let (state, submission_id) = submit(state);

    let (state, _) = update(
        state,
        Msg::SubmissionDone {
            submission_id,
            result: Err("bad input".to_string()),
        },
    );

    assert!(!state.is_loading());
    assert_eq!(state.error(), Some("bad input"));
    assert_eq!(state.response(), None);
    assert_eq!(state.status(), RequestStatus::Completed);
}

#[test]
fn new_submission_clears_previous_result() {
    init_logging();
    let state = filled_form(vec![pdf("a.pdf")]);
    let (state, first_id) = submit(state);
    let (state, _) = update(
        state,
        Msg::SubmissionDone {
            submission_id: first_id,
            result: Err("HTTP error! status: 500".to_string()),
        },
    );

    let (state, second_id) = submit(state);

    assert_ne!(first_id, second_id);
    assert_eq!(state.error(), None);
    assert_eq!(state.response(), None);
    assert_eq!(state.status(), RequestStatus::InFlight);

    let (state, _) = update(
        state,
        Msg::SubmissionDone {
            submission_id: second_id,
            result: Ok(json!({"ok": true})),
        },
    );
    assert_eq!(state.error(), None);
    assert_eq!(state.response(), Some(&json!({"ok": true})));
}

#[test]
fn stale_completion_is_ignored() {
    init_logging();
    let state = filled_form(vec![pdf("a.pdf")]);
    let (state, first_id) = submit(state);
    let (state, _) = update(
        state,
        Msg::SubmissionDone {
            submission_id: first_id,
            result: Ok(json!({"first": true})),
        },
    );
    let (mut state, second_id) = submit(state);
    state.consume_dirty();
    let before = state.clone();

    let (mut state, _) = update(
        state,
        Msg::SubmissionDone {
            submission_id: first_id,
            result: Err("late".to_string()),
        },
    );

    assert_eq!(state, before);
    assert!(!state.consume_dirty());
    assert_eq!(state.in_flight(), Some(second_id));
}

#[test]
fn progress_updates_stage_for_current_submission_only() {
    init_logging();
    let state = filled_form(vec![pdf("a.pdf")]);
    let (state, submission_id) = submit(state);

    let (state, _) = update(
        state,
        Msg::SubmissionProgress {
            submission_id,
            stage: Stage::Uploading,
        },
    );
    assert_eq!(state.view().stage, Some(Stage::Uploading));

    let (state, _) = update(
        state,
        Msg::SubmissionProgress {
            submission_id: submission_id + 7,
            stage: Stage::Reading,
        },
    );
    assert_eq!(state.view().stage, Some(Stage::Uploading));

    let (state, _) = update(
        state,
        Msg::SubmissionDone {
            submission_id,
            result: Ok(json!(null)),
        },
    );
    assert_eq!(state.view().stage, None);
    assert_eq!(state.status(), RequestStatus::Completed);
}

#[test]
fn exactly_one_result_after_each_resolution() {
    init_logging();
    let mut state = filled_form(vec![pdf("a.pdf")]);
    let outcomes = [
        Ok(json!({"a": 1})),
        Err("boom".to_string()),
        Ok(json!([])),
        Err("again".to_string()),
    ];

    for result in outcomes {
        let (next, submission_id) = submit(state);
        let (next, _) = update(
            next,
            Msg::SubmissionDone {
                submission_id,
                result,
            },
        );
        assert!(!next.is_loading());
        assert!(next.response().is_some() ^ next.error().is_some());
        state = next;
    }
}
