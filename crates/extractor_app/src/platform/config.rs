//! Settings layering: CLI flag, then `EXTRACTOR_ENDPOINT`, then the RON
//! config file, then built-in defaults. clap folds the first two together.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use engine_logging::{engine_debug, engine_info};
use extractor_engine::{SubmitSettings, DEFAULT_ENDPOINT};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILENAME: &str = "extractor.ron";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
}

/// Values supplied on the command line (or through the environment).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub submit: SubmitSettings,
    pub output_dir: Option<PathBuf>,
}

/// Reads the config file. An explicit path must exist; the implicit
/// `./extractor.ron` is optional.
pub fn load_file_config(explicit: Option<&Path>) -> anyhow::Result<FileConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            engine_debug!("No config file at {:?}; using defaults", path);
            return Ok(FileConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {}", path.display()))
        }
    };

    let config: FileConfig = ron::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    engine_info!("Loaded config from {:?}", path);
    Ok(config)
}

pub fn resolve(overrides: &Overrides, file: FileConfig) -> anyhow::Result<Settings> {
    let endpoint = overrides
        .endpoint
        .clone()
        .or(file.endpoint)
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    validate_endpoint(&endpoint)?;

    let request_timeout_secs = overrides.request_timeout_secs.or(file.request_timeout_secs);

    Ok(Settings {
        submit: SubmitSettings {
            endpoint,
            connect_timeout: file.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: request_timeout_secs.map(Duration::from_secs),
        },
        output_dir: overrides.output_dir.clone().or(file.output_dir),
    })
}

fn validate_endpoint(raw: &str) -> anyhow::Result<()> {
    let url = url::Url::parse(raw).with_context(|| format!("invalid endpoint {raw:?}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("endpoint {raw:?} must use http or https");
    }
    Ok(())
}
