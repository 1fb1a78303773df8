use std::io;
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use scout_core::{update, AppState, Msg, SessionState};
use scout_logging::{scout_error, scout_info, scout_warn};

use super::cli::Cli;
use super::effects::EffectRunner;
use super::ui::render::{render, FramePrinter};
use super::{config, export, logging};

pub const EXIT_STARTUP_ERROR: u8 = 2;
const EXIT_DEADLINE: u8 = 3;

/// Idle wake-up so deadlines are noticed without engine traffic.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

pub fn run_app() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let level = scout_logging::parse_level(&cli.log_level).unwrap_or(LevelFilter::Info);
    logging::initialize(cli.log_destination, level);

    let file_settings = cli
        .config
        .as_deref()
        .map(config::load_settings_file)
        .unwrap_or_default();
    let settings = config::resolve(&file_settings, &cli);
    let github_prompt = cli
        .github_prompt
        .clone()
        .or_else(|| file_settings.github_prompt.clone());
    scout_info!(
        "Starting scout server={} poll_interval_ms={} max_polls={:?}",
        settings.base_url,
        settings.poll_interval.as_millis(),
        settings.max_poll_attempts
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(settings, github_prompt, msg_tx.clone())
        .context("failed to start the job engine")?;

    if let Some(text) = cli.prompt.clone() {
        msg_tx.send(Msg::InputChanged(text))?;
    }
    if let Some(path) = &cli.file {
        msg_tx.send(Msg::FileSelected {
            path: path.display().to_string(),
        })?;
    }
    msg_tx.send(Msg::SearchClicked)?;

    let deadline = cli
        .deadline_secs
        .map(|secs| Instant::now() + Duration::from_secs(secs));
    let mut state = AppState::new();
    let mut printer = FramePrinter::new();
    let mut stdout = io::stdout();
    let mut searched = false;
    let mut deadline_hit = false;

    loop {
        let msg = match msg_rx.recv_timeout(TICK_INTERVAL) {
            Ok(msg) => msg,
            Err(mpsc::RecvTimeoutError::Timeout) => Msg::Tick,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };
        searched |= msg == Msg::SearchClicked;

        let msg = match deadline {
            Some(at) if !deadline_hit && state.session().is_busy() && Instant::now() >= at => {
                scout_warn!("Deadline reached; cancelling the search");
                deadline_hit = true;
                // Re-queue the message that arrived alongside the deadline.
                msg_tx.send(msg)?;
                Msg::CancelClicked
            }
            _ => msg,
        };

        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);

        if state.consume_dirty() {
            printer
                .print(&mut stdout, render(&state.view()))
                .context("failed to write to stdout")?;
        }

        if !searched {
            continue;
        }
        if deadline_hit && state.session() == SessionState::Idle {
            runner.shutdown();
            eprintln!("scout: search cancelled after reaching the deadline");
            return Ok(ExitCode::from(EXIT_DEADLINE));
        }
        if state.session().is_terminal() {
            break;
        }
    }

    runner.shutdown();
    finish(&cli, &state)
}

fn finish(cli: &Cli, state: &AppState) -> anyhow::Result<ExitCode> {
    match state.session() {
        SessionState::Succeeded => {
            if let (Some(path), Some(candidates)) = (&cli.output, state.results()) {
                export::export_results(path, candidates)
                    .with_context(|| format!("failed to export results to {}", path.display()))?;
            }
            scout_info!(
                "Search finished with {} candidates",
                state.results().map_or(0, <[_]>::len)
            );
            Ok(ExitCode::SUCCESS)
        }
        other => {
            scout_error!("Search ended in state {:?}", other);
            Ok(ExitCode::FAILURE)
        }
    }
}
