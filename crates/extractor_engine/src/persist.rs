use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use engine_logging::engine_info;
use tempfile::NamedTempFile;
use thiserror::Error;

const RESPONSE_PREFIX: &str = "semantic_filtered_output";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// `semantic_filtered_output--{stamp}.json`, with characters that are not
/// valid in Windows filenames replaced by `-`.
pub fn response_filename(stamp: &str) -> String {
    let safe: String = stamp
        .chars()
        .map(|c| if is_forbidden(c) { '-' } else { c })
        .collect();
    format!("{RESPONSE_PREFIX}--{safe}.json")
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
}

/// Pretty-prints the response into `{dir}/{response_filename(stamp)}`.
pub fn write_response(
    dir: &Path,
    response: &serde_json::Value,
    stamp: &str,
) -> Result<PathBuf, PersistError> {
    let mut content = serde_json::to_string_pretty(response)?;
    content.push('\n');
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let path = writer.write(&response_filename(stamp), content.as_bytes())?;
    engine_info!("Saved response to {:?}", path);
    Ok(path)
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // `persist` does not overwrite on every platform.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
