use crate::text;
use crate::view_model::{AppViewModel, CandidateRowView};

/// Submission cycle counter. Bumped on every search and cancel so results
/// belonging to an abandoned cycle can be recognised and dropped.
pub type Cycle = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Submitting,
    Polling,
    Succeeded,
    Failed,
}

impl SessionState {
    /// True while a job is being created or polled.
    pub fn is_busy(self) -> bool {
        matches!(self, SessionState::Submitting | SessionState::Polling)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Succeeded | SessionState::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: Option<String>,
    pub link: String,
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending { message: String },
    Complete { candidates: Vec<Candidate> },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    prompt_text: String,
    prompt_file: Option<String>,
    session: SessionState,
    cycle: Cycle,
    job_id: Option<String>,
    loading_message: Option<String>,
    results: Option<Vec<Candidate>>,
    error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    /// Final candidates of a successful search, in server order.
    pub fn results(&self) -> Option<&[Candidate]> {
        self.results.as_deref()
    }

    pub fn view(&self) -> AppViewModel {
        let busy = self.session.is_busy();
        AppViewModel {
            session: self.session,
            prompt_text: self.prompt_text.clone(),
            prompt_file: self.prompt_file.clone(),
            text_input_enabled: !busy && self.prompt_file.is_none(),
            file_input_enabled: !busy,
            search_enabled: !busy,
            cancel_enabled: busy,
            loading_message: if busy {
                self.loading_message.clone()
            } else {
                None
            },
            results: self
                .results
                .as_ref()
                .map(|candidates| candidates.iter().map(CandidateRowView::from).collect()),
            error: self.error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_prompt_text(&mut self, text: String) -> bool {
        if self.session.is_busy() || self.prompt_file.is_some() || self.prompt_text == text {
            return false;
        }
        self.prompt_text = text;
        self.dirty = true;
        true
    }

    pub(crate) fn select_file(&mut self, path: String) -> bool {
        if self.session.is_busy() {
            return false;
        }
        self.prompt_file = Some(path);
        self.prompt_text.clear();
        self.dirty = true;
        true
    }

    pub(crate) fn clear_file(&mut self) -> bool {
        if self.session.is_busy() || self.prompt_file.is_none() {
            return false;
        }
        self.prompt_file = None;
        self.dirty = true;
        true
    }

    pub(crate) fn prompt_file(&self) -> Option<&str> {
        self.prompt_file.as_deref()
    }

    pub(crate) fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    /// Starts a new submission cycle and returns its number.
    pub(crate) fn begin_cycle(&mut self) -> Cycle {
        self.cycle += 1;
        self.session = SessionState::Submitting;
        self.job_id = None;
        self.results = None;
        self.error = None;
        self.loading_message = Some(text::CREATING_JOB.to_string());
        self.dirty = true;
        self.cycle
    }

    pub(crate) fn is_current_submission(&self, cycle: Cycle) -> bool {
        self.session == SessionState::Submitting && self.cycle == cycle
    }

    pub(crate) fn is_polling(&self, job_id: &str) -> bool {
        self.session == SessionState::Polling && self.job_id.as_deref() == Some(job_id)
    }

    pub(crate) fn start_polling(&mut self, job_id: String) {
        self.session = SessionState::Polling;
        self.job_id = Some(job_id);
        self.loading_message = Some(text::JOB_CREATED.to_string());
        self.dirty = true;
    }

    pub(crate) fn set_loading_message(&mut self, message: String) {
        if self.loading_message.as_deref() != Some(message.as_str()) {
            self.loading_message = Some(message);
            self.dirty = true;
        }
    }

    pub(crate) fn succeed(&mut self, candidates: Vec<Candidate>) {
        self.session = SessionState::Succeeded;
        self.job_id = None;
        self.loading_message = None;
        self.results = Some(candidates);
        self.error = None;
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, error: String) {
        self.session = SessionState::Failed;
        self.job_id = None;
        self.loading_message = None;
        self.results = None;
        self.error = Some(error);
        self.dirty = true;
    }

    /// Abandons the running cycle; late results for it will no longer match.
    pub(crate) fn cancel(&mut self) {
        self.cycle += 1;
        self.session = SessionState::Idle;
        self.job_id = None;
        self.loading_message = None;
        self.dirty = true;
    }
}
