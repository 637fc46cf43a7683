use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use engine_logging::{engine_error, engine_info, engine_warn, level_for_verbosity};
use extractor_core::{update, AppState, Msg, RequestStatus, SelectedFile};
use extractor_engine::{load_selection, write_response, EngineHandle, UploadFile};

use super::config::{load_file_config, resolve, Settings};
use super::effects::{to_selected_file, EffectRunner};
use super::logging::{self, LogDestination};
use super::ui::console::Console;
use super::ui::render::render;
use crate::cli::Args;

/// A failed run, split by who can fix it.
#[derive(Debug)]
pub enum RunError {
    /// Bad flags, config or paths: nothing was attempted.
    Usage(anyhow::Error),
    /// The run started but could not finish.
    Runtime(anyhow::Error),
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Usage(_) => 2,
            RunError::Runtime(_) => 1,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Usage(err) | RunError::Runtime(err) => write!(f, "{err:#}"),
        }
    }
}

pub fn run_app(args: Args) -> Result<ExitCode, RunError> {
    let destination = if args.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    logging::initialize(level_for_verbosity(args.verbose, args.quiet), destination);

    let (settings, files) = prepare(&args).map_err(RunError::Usage)?;
    let quiet = args.quiet;
    execute(settings, files, args.persona, args.job_to_be_done, quiet).map_err(|err| {
        engine_error!("Run failed: {:#}", err);
        RunError::Runtime(err)
    })
}

fn prepare(args: &Args) -> anyhow::Result<(Settings, Vec<UploadFile>)> {
    let file_config = load_file_config(args.config.as_deref())?;
    let settings = resolve(&args.overrides(), file_config)?;
    engine_info!("Using endpoint {}", settings.submit.endpoint);

    let files = load_selection(&args.paths).context("failed to load selected files")?;
    Ok((settings, files))
}

fn execute(
    settings: Settings,
    files: Vec<UploadFile>,
    persona: String,
    job_to_be_done: String,
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    let engine = EngineHandle::new(settings.submit).context("failed to start engine")?;
    let console = Console::new(io::stdout(), io::stderr(), quiet);
    let mut session = Session::new(EffectRunner::new(engine), console);

    let outcome = session.submit_form(
        files.into_iter().map(to_selected_file).collect(),
        persona,
        job_to_be_done,
    )?;

    match outcome {
        Outcome::Succeeded => {
            if let (Some(dir), Some(response)) = (&settings.output_dir, session.state().response())
            {
                save_response(dir, response);
            }
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Failed => Ok(ExitCode::FAILURE),
        Outcome::Blocked => {
            session
                .console_mut()
                .notice("Nothing was submitted: select at least one file and fill in every required field.")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn save_response(dir: &Path, response: &serde_json::Value) {
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    if let Err(err) = write_response(dir, response, &stamp) {
        engine_error!("Failed to save response to {:?}: {}", dir, err);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
    /// The submit guard refused; no request was sent.
    Blocked,
}

/// Owns the form state and drives it from user input and engine events.
pub struct Session<O: Write, E: Write> {
    state: AppState,
    runner: EffectRunner,
    console: Console<O, E>,
}

impl<O: Write, E: Write> Session<O, E> {
    pub fn new(runner: EffectRunner, console: Console<O, E>) -> Self {
        Self {
            state: AppState::new(),
            runner,
            console,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn console_mut(&mut self) -> &mut Console<O, E> {
        &mut self.console
    }

    /// Fills in the form, presses submit, and waits for the result.
    pub fn submit_form(
        &mut self,
        files: Vec<SelectedFile>,
        persona: String,
        job_to_be_done: String,
    ) -> anyhow::Result<Outcome> {
        self.dispatch(Msg::FilesSelected(files));
        self.dispatch(Msg::PersonaChanged(persona));
        self.dispatch(Msg::JobToBeDoneChanged(job_to_be_done));
        self.dispatch(Msg::SubmitClicked);
        self.render_if_dirty()?;

        if self.state.status() != RequestStatus::InFlight {
            engine_warn!(
                "Submit blocked: files={} missing={:?}",
                self.state.selection().len(),
                self.state.missing_required_fields()
            );
            return Ok(Outcome::Blocked);
        }

        while self.state.status() == RequestStatus::InFlight {
            let msg = self
                .runner
                .next_msg()
                .context("engine stopped before the submission completed")?;
            self.dispatch(msg);
            self.render_if_dirty()?;
        }

        Ok(if self.state.error().is_some() {
            Outcome::Failed
        } else {
            Outcome::Succeeded
        })
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Renders one snapshot for everything dispatched since the last call.
    pub fn render_if_dirty(&mut self) -> io::Result<()> {
        if self.state.consume_dirty() {
            self.console.apply(render(&self.state.view()))?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn into_console(self) -> Console<O, E> {
        self.console
    }
}
