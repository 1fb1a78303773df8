use std::sync::Once;

use pretty_assertions::assert_eq;
use scout_core::{text, update, AppState, Effect, Msg, SessionState};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scout_logging::initialize_for_tests);
}

fn search_text(input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(AppState::new(), Msg::InputChanged(input.to_string()));
    update(state, Msg::SearchClicked)
}

#[test]
fn search_with_text_submits_untrimmed_prompt() {
    init_logging();
    let (mut state, effects) = search_text("  Senior Rust developer in Pune \n");

    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            cycle: 1,
            prompt: "  Senior Rust developer in Pune \n".to_string(),
        }]
    );
    let view = state.view();
    assert_eq!(view.session, SessionState::Submitting);
    assert_eq!(view.loading_message.as_deref(), Some(text::CREATING_JOB));
    assert!(!view.text_input_enabled);
    assert!(!view.file_input_enabled);
    assert!(!view.search_enabled);
    assert!(view.cancel_enabled);
    assert_eq!(view.search_label(), "Searching...");
    assert!(state.consume_dirty());
}

#[test]
fn whitespace_only_input_fails_without_effects() {
    init_logging();
    let (state, effects) = search_text(" \n\t ");

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.session, SessionState::Failed);
    assert_eq!(view.error.as_deref(), Some(text::EMPTY_INPUT));
    assert_eq!(view.loading_message, None);
    assert!(view.search_enabled);
}

#[test]
fn empty_input_without_file_fails() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SearchClicked);

    assert!(effects.is_empty());
    assert_eq!(state.view().error.as_deref(), Some(text::EMPTY_INPUT));
}

#[test]
fn selecting_file_clears_text_and_reads_file_on_search() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::InputChanged("typed".to_string()));
    let (state, _) = update(
        state,
        Msg::FileSelected {
            path: "jd.txt".to_string(),
        },
    );
    let view = state.view();
    assert_eq!(view.prompt_text, "");
    assert_eq!(view.prompt_file.as_deref(), Some("jd.txt"));
    assert!(!view.text_input_enabled);

    // The text box is disabled while a file is selected.
    let (state, _) = update(state, Msg::InputChanged("ignored".to_string()));
    assert_eq!(state.view().prompt_text, "");

    let (state, effects) = update(state, Msg::SearchClicked);
    assert_eq!(
        effects,
        vec![Effect::ReadPromptFile {
            cycle: 1,
            path: "jd.txt".to_string(),
        }]
    );

    let (state, effects) = update(
        state,
        Msg::PromptFileRead {
            cycle: 1,
            result: Ok("Backend engineer".to_string()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            cycle: 1,
            prompt: "Backend engineer".to_string(),
        }]
    );
    assert_eq!(state.session(), SessionState::Submitting);
}

#[test]
fn clearing_file_reenables_text_input() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::FileSelected {
            path: "jd.md".to_string(),
        },
    );
    let (state, _) = update(state, Msg::FileCleared);
    let (state, _) = update(state, Msg::InputChanged("typed".to_string()));

    let view = state.view();
    assert_eq!(view.prompt_file, None);
    assert_eq!(view.prompt_text, "typed");
}

#[test]
fn unreadable_file_fails_the_cycle() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::FileSelected {
            path: "missing.txt".to_string(),
        },
    );
    let (state, _) = update(state, Msg::SearchClicked);
    let (state, effects) = update(
        state,
        Msg::PromptFileRead {
            cycle: 1,
            result: Err("file read error: not found".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Failed);
    assert_eq!(
        state.view().error.as_deref(),
        Some("Could not read the uploaded file. (file read error: not found)")
    );
}

#[test]
fn blank_file_contents_count_as_empty_input() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::FileSelected {
            path: "blank.txt".to_string(),
        },
    );
    let (state, _) = update(state, Msg::SearchClicked);
    let (state, effects) = update(
        state,
        Msg::PromptFileRead {
            cycle: 1,
            result: Ok("\n\n".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().error.as_deref(), Some(text::EMPTY_INPUT));
}

#[test]
fn submission_success_starts_polling() {
    init_logging();
    let (state, _) = search_text("Data engineer");
    let (state, effects) = update(
        state,
        Msg::JobSubmitted {
            cycle: 1,
            result: Ok("job-42".to_string()),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            job_id: "job-42".to_string(),
        }]
    );
    assert_eq!(state.session(), SessionState::Polling);
    assert_eq!(state.job_id(), Some("job-42"));
    assert_eq!(state.view().loading_message.as_deref(), Some(text::JOB_CREATED));
}

#[test]
fn submission_failure_is_terminal_and_reenables_inputs() {
    init_logging();
    let (state, _) = search_text("Data engineer");
    let (state, effects) = update(
        state,
        Msg::JobSubmitted {
            cycle: 1,
            result: Err("http status 500: Internal Server Error".to_string()),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.session, SessionState::Failed);
    assert_eq!(
        view.error.as_deref(),
        Some(
            "Failed to create the sourcing job. Is the server running? \
             (http status 500: Internal Server Error)"
        )
    );
    assert!(view.search_enabled);
    assert!(view.text_input_enabled);
}

#[test]
fn search_is_ignored_while_busy() {
    init_logging();
    let (state, _) = search_text("Data engineer");
    let (state, effects) = update(state, Msg::SearchClicked);

    assert!(effects.is_empty());
    assert_eq!(state.cycle(), 1);
}

#[test]
fn a_new_search_after_failure_starts_a_new_cycle() {
    init_logging();
    let (state, _) = search_text("Data engineer");
    let (state, _) = update(
        state,
        Msg::JobSubmitted {
            cycle: 1,
            result: Err("network error".to_string()),
        },
    );
    let (state, effects) = update(state, Msg::SearchClicked);

    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            cycle: 2,
            prompt: "Data engineer".to_string(),
        }]
    );
    assert_eq!(state.view().error, None);
}
