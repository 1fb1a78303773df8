//! User-visible strings shown by the presentation layer.

pub const CREATING_JOB: &str = "Creating sourcing job...";
pub const JOB_CREATED: &str = "Job created successfully! Now polling for results...";
pub const JOB_STATUS_PREFIX: &str = "Job Status: ";
pub const EMPTY_INPUT: &str = "Please provide a job description or a file.";
pub const FILE_READ_FAILED: &str = "Could not read the uploaded file.";
pub const SUBMIT_FAILED: &str = "Failed to create the sourcing job. Is the server running?";
pub const POLL_FAILED: &str = "Failed to retrieve job results.";
pub const NO_CANDIDATES: &str = "No candidates found for the given job description.";
pub const MISSING_FIELD: &str = "N/A";

/// Appends a technical cause to a user-facing message.
pub fn with_cause(text: &str, cause: &str) -> String {
    let cause = cause.trim();
    if cause.is_empty() {
        text.to_string()
    } else {
        format!("{text} ({cause})")
    }
}
