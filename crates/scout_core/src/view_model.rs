use crate::{text, Candidate, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub prompt_text: String,
    pub prompt_file: Option<String>,
    pub text_input_enabled: bool,
    pub file_input_enabled: bool,
    pub search_enabled: bool,
    pub cancel_enabled: bool,
    /// Progress line shown while a job is in flight.
    pub loading_message: Option<String>,
    /// `Some` once a search succeeded; may be empty.
    pub results: Option<Vec<CandidateRowView>>,
    pub error: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn search_label(&self) -> &'static str {
        if self.session.is_busy() {
            "Searching..."
        } else {
            "Search"
        }
    }
}

/// A candidate ready for display; missing fields are filled with a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRowView {
    pub name: String,
    pub link: String,
    pub snippet: String,
}

impl From<&Candidate> for CandidateRowView {
    fn from(candidate: &Candidate) -> Self {
        Self {
            name: display_or_placeholder(candidate.name.as_deref()),
            link: candidate.link.clone(),
            snippet: display_or_placeholder(candidate.snippet.as_deref()),
        }
    }
}

fn display_or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => text::MISSING_FIELD.to_string(),
    }
}
