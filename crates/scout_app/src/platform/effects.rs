use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use scout_core::{Candidate, Effect, JobStatus, Msg};
use scout_engine::{ClientSettings, EngineEvent, EngineHandle, JobError, JobRequest};
use scout_logging::{scout_debug, scout_info, scout_warn};

pub struct EffectRunner {
    engine: EngineHandle,
    github_prompt: Option<String>,
}

impl EffectRunner {
    pub fn new(
        settings: ClientSettings,
        github_prompt: Option<String>,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Result<Self, JobError> {
        let engine = EngineHandle::new(settings)?;
        let runner = Self {
            engine,
            github_prompt,
        };
        runner.spawn_event_loop(msg_tx);
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ReadPromptFile { cycle, path } => {
                    scout_info!("ReadPromptFile cycle={} path={}", cycle, path);
                    self.engine.read_prompt(cycle, path);
                }
                Effect::SubmitJob { cycle, prompt } => {
                    scout_info!("SubmitJob cycle={} prompt_len={}", cycle, prompt.len());
                    let request =
                        JobRequest::from_text(prompt).with_github_prompt(self.github_prompt.clone());
                    self.engine.submit(cycle, request);
                }
                Effect::StartPolling { job_id } => {
                    scout_info!("StartPolling job_id={}", job_id);
                    self.engine.start_polling(job_id);
                }
                Effect::CancelPolling => {
                    scout_info!("CancelPolling");
                    self.engine.cancel_polling();
                }
            }
        }
    }

    /// Stops the engine; the event thread exits once the engine is gone.
    pub fn shutdown(&self) {
        scout_info!("Shutting down engine");
        self.engine.shutdown();
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let event = match engine.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    scout_debug!("Engine event channel closed");
                    break;
                }
            };
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PromptRead { cycle, result } => Msg::PromptFileRead {
            cycle,
            result: result.map_err(|err| {
                scout_warn!("Prompt file for cycle {} unreadable: {}", cycle, err);
                err.to_string()
            }),
        },
        EngineEvent::Submitted { cycle, result } => Msg::JobSubmitted {
            cycle,
            result: result.map(|handle| handle.job_id).map_err(|err| {
                scout_warn!("Submission for cycle {} failed: {}", cycle, err);
                err.to_string()
            }),
        },
        EngineEvent::Status { job_id, status } => Msg::JobStatusChanged {
            job_id,
            status: map_status(status),
        },
    }
}

fn map_status(status: scout_engine::JobStatus) -> JobStatus {
    match status {
        scout_engine::JobStatus::Pending { message } => JobStatus::Pending { message },
        scout_engine::JobStatus::Complete { candidates } => JobStatus::Complete {
            candidates: candidates.into_iter().map(map_candidate).collect(),
        },
        scout_engine::JobStatus::Failed { reason, .. } => JobStatus::Failed { reason },
    }
}

fn map_candidate(candidate: scout_engine::Candidate) -> Candidate {
    Candidate {
        name: candidate.name,
        link: candidate.link,
        snippet: candidate.snippet,
    }
}
