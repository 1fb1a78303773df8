use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::decode::decode_text;
use crate::{FailureKind, JobError};

/// A sourcing job to create. `prompt_text` comes from pasted text or an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub prompt_text: String,
    pub github_prompt: Option<String>,
}

impl JobRequest {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            prompt_text: text.into(),
            github_prompt: None,
        }
    }

    pub fn from_file(path: &Path, max_bytes: u64) -> Result<Self, JobError> {
        read_prompt_file(path, max_bytes).map(Self::from_text)
    }

    /// Adds the optional GitHub campaign prompt; blank values are dropped.
    pub fn with_github_prompt(mut self, prompt: Option<String>) -> Self {
        self.github_prompt = prompt.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.prompt_text.trim().is_empty()
    }

    pub(crate) fn body(&self) -> CreateJobBody<'_> {
        CreateJobBody {
            linkedin_prompt: &self.prompt_text,
            github_prompt: self.github_prompt.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateJobBody<'a> {
    linkedin_prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    github_prompt: Option<&'a str>,
}

/// Read and decode an uploaded job description file.
pub fn read_prompt_file(path: &Path, max_bytes: u64) -> Result<String, JobError> {
    let file_read = |message: String| JobError::new(FailureKind::FileRead, message);

    let meta = fs::metadata(path).map_err(|e| file_read(format!("{}: {e}", path.display())))?;
    if !meta.is_file() {
        return Err(file_read(format!("{} is not a regular file", path.display())));
    }
    if meta.len() > max_bytes {
        return Err(file_read(format!(
            "{} is {} bytes, limit is {max_bytes}",
            path.display(),
            meta.len()
        )));
    }

    let bytes = fs::read(path).map_err(|e| file_read(format!("{}: {e}", path.display())))?;
    let decoded = decode_text(&bytes).map_err(|e| file_read(format!("{}: {e}", path.display())))?;
    Ok(decoded.text)
}
