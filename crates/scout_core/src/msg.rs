use crate::{Cycle, JobStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the job description text.
    InputChanged(String),
    /// User picked a job description file; clears the text input.
    FileSelected { path: String },
    /// User removed the selected file.
    FileCleared,
    /// User asked to start a search with the current input.
    SearchClicked,
    /// User abandoned the running search.
    CancelClicked,
    /// Engine finished reading the selected file. `Err` carries the cause.
    PromptFileRead {
        cycle: Cycle,
        result: Result<String, String>,
    },
    /// Engine finished creating the job. `Ok` carries the job id.
    JobSubmitted {
        cycle: Cycle,
        result: Result<String, String>,
    },
    /// Poller delivered a status for a job.
    JobStatusChanged { job_id: String, status: JobStatus },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
