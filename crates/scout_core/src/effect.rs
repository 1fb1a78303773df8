use crate::Cycle;

/// Side effects requested by [`crate::update`]; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ReadPromptFile { cycle: Cycle, path: String },
    SubmitJob { cycle: Cycle, prompt: String },
    StartPolling { job_id: String },
    CancelPolling,
}
