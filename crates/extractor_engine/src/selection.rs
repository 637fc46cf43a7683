use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_info};
use thiserror::Error;

use crate::UploadFile;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("{0}: no such file or directory")]
    Missing(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Case-insensitive `.pdf` check, matching the picker's `accept` hint.
pub fn is_pdf_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Loads the selection in argument order.
///
/// Files are taken as given. A directory contributes its `*.pdf` entries
/// sorted by name; subdirectories are not searched.
pub fn load_selection(paths: &[PathBuf]) -> Result<Vec<UploadFile>, SelectionError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in pdf_entries(path)? {
                files.push(read_file(&entry)?);
            }
        } else if path.exists() {
            files.push(read_file(path)?);
        } else {
            return Err(SelectionError::Missing(path.clone()));
        }
    }
    engine_info!("Loaded {} file(s) for upload", files.len());
    Ok(files)
}

fn pdf_entries(dir: &Path) -> Result<Vec<PathBuf>, SelectionError> {
    let io_err = |source| SelectionError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_pdf = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(is_pdf_name);
        if path.is_file() && is_pdf {
            entries.push(path);
        } else {
            engine_debug!("Skipping non-PDF entry {:?}", path);
        }
    }
    entries.sort();
    Ok(entries)
}

fn read_file(path: &Path) -> Result<UploadFile, SelectionError> {
    let content = fs::read(path).map_err(|source| SelectionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadFile::new(name, content))
}
