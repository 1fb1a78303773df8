//! Writes the final candidate list as pretty-printed JSON.

use std::path::Path;

use chrono::Utc;
use scout_core::Candidate;
use scout_engine::{write_atomically, PersistError};
use scout_logging::scout_info;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Serialize)]
struct ExportedResults<'a> {
    exported_utc: String,
    candidate_count: usize,
    candidates: Vec<ExportedCandidate<'a>>,
}

#[derive(Debug, Serialize)]
struct ExportedCandidate<'a> {
    name: Option<&'a str>,
    link: &'a str,
    snippet: Option<&'a str>,
}

pub fn export_results(path: &Path, candidates: &[Candidate]) -> Result<(), ExportError> {
    let content = render_export(candidates, Utc::now().to_rfc3339())?;
    write_atomically(path, &content)?;
    scout_info!("Exported {} candidates to {:?}", candidates.len(), path);
    Ok(())
}

fn render_export(candidates: &[Candidate], exported_utc: String) -> Result<String, ExportError> {
    let results = ExportedResults {
        exported_utc,
        candidate_count: candidates.len(),
        candidates: candidates
            .iter()
            .map(|c| ExportedCandidate {
                name: c.name.as_deref(),
                link: &c.link,
                snippet: c.snippet.as_deref(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&results)?)
}
