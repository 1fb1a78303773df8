use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output path {path:?} is not usable: {message}")]
    OutputPath { path: PathBuf, message: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Atomically replace `target` with `content`: write a sibling temp file,
/// sync it, then rename over the destination. Missing parent directories
/// are created.
pub fn write_atomically(target: &Path, content: &str) -> Result<(), PersistError> {
    let output_path = |message: String| PersistError::OutputPath {
        path: target.to_path_buf(),
        message,
    };

    if target.file_name().is_none() {
        return Err(output_path("missing file name".into()));
    }
    if target.is_dir() {
        return Err(output_path("is a directory".into()));
    }

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| output_path(e.to_string()))?;
    } else if !dir.is_dir() {
        return Err(output_path(format!("{} is not a directory", dir.display())));
    }

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}
