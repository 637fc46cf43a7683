//! Platform logging initialization for the extractor CLI.
//!
//! Terminal output goes to stderr so stdout carries only the payload.
//! The optional file log is `./extractor.log` in the current directory.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILENAME: &str = "./extractor.log";

/// Destination for log output.
pub enum LogDestination {
    /// Write to the terminal (stderr).
    Terminal,
    /// Write to the terminal and to ./extractor.log.
    Both,
}

/// Initialize the logger with the specified level and destination.
pub fn initialize(level: LevelFilter, destination: LogDestination) {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let LogDestination::Both = destination {
        // The file always records at least info, whatever the terminal shows.
        if let Some(file_logger) = create_file_logger(level.max(LevelFilter::Info), config) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("rustls")
        .build()
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from(LOG_FILENAME);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
