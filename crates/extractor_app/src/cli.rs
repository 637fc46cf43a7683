use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::platform::Overrides;

/// Upload PDF files with a persona and a job to be done to the semantic
/// extraction backend, then print its JSON response.
#[derive(Parser, Debug)]
#[command(name = "pdf-extractor", version)]
pub struct Args {
    /// PDF files, or directories whose *.pdf entries are uploaded.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Intended reader role, forwarded verbatim.
    #[arg(long, value_name = "TEXT")]
    pub persona: String,

    /// Task description, forwarded verbatim.
    #[arg(long = "job", value_name = "TEXT")]
    pub job_to_be_done: String,

    /// Processing endpoint [default: http://localhost:8000/process].
    #[arg(long, value_name = "URL", env = "EXTRACTOR_ENDPOINT")]
    pub endpoint: Option<String>,

    /// RON config file. Defaults to ./extractor.ron when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also save a successful response as JSON in this directory.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Give up on the request after this many seconds. No limit by default.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Additionally write logs to ./extractor.log.
    #[arg(long, default_value_t = false)]
    pub log_file: bool,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print the payload or the error.
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            output_dir: self.output_dir.clone(),
            request_timeout_secs: self.timeout_secs,
        }
    }
}
