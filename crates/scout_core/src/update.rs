use crate::{text, AppState, Effect, JobStatus, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(value) => {
            state.set_prompt_text(value);
            Vec::new()
        }
        Msg::FileSelected { path } => {
            state.select_file(path);
            Vec::new()
        }
        Msg::FileCleared => {
            state.clear_file();
            Vec::new()
        }
        Msg::SearchClicked => {
            if state.session().is_busy() {
                return (state, Vec::new());
            }
            let file = state.prompt_file().map(ToOwned::to_owned);
            let prompt = state.prompt_text().to_string();
            let cycle = state.begin_cycle();
            match file {
                Some(path) => vec![Effect::ReadPromptFile { cycle, path }],
                None => submit_or_reject(&mut state, cycle, prompt),
            }
        }
        Msg::CancelClicked => {
            let session = state.session();
            if !session.is_busy() {
                return (state, Vec::new());
            }
            state.cancel();
            if session == crate::SessionState::Polling {
                vec![Effect::CancelPolling]
            } else {
                Vec::new()
            }
        }
        Msg::PromptFileRead { cycle, result } => {
            if !state.is_current_submission(cycle) {
                return (state, Vec::new());
            }
            match result {
                Ok(prompt) => submit_or_reject(&mut state, cycle, prompt),
                Err(cause) => {
                    state.fail(text::with_cause(text::FILE_READ_FAILED, &cause));
                    Vec::new()
                }
            }
        }
        Msg::JobSubmitted { cycle, result } => {
            if !state.is_current_submission(cycle) {
                return (state, Vec::new());
            }
            match result {
                Ok(job_id) => {
                    state.start_polling(job_id.clone());
                    vec![Effect::StartPolling { job_id }]
                }
                Err(cause) => {
                    state.fail(text::with_cause(text::SUBMIT_FAILED, &cause));
                    Vec::new()
                }
            }
        }
        Msg::JobStatusChanged { job_id, status } => {
            if !state.is_polling(&job_id) {
                return (state, Vec::new());
            }
            match status {
                JobStatus::Pending { message } => {
                    state.set_loading_message(format!("{}{}", text::JOB_STATUS_PREFIX, message));
                }
                JobStatus::Complete { candidates } => state.succeed(candidates),
                JobStatus::Failed { reason } => {
                    state.fail(text::with_cause(text::POLL_FAILED, &reason));
                }
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_or_reject(state: &mut AppState, cycle: crate::Cycle, prompt: String) -> Vec<Effect> {
    if prompt.trim().is_empty() {
        state.fail(text::EMPTY_INPUT.to_string());
        return Vec::new();
    }
    vec![Effect::SubmitJob { cycle, prompt }]
}
