use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use scout_logging::{scout_debug, scout_warn};

use crate::client::{ClientSettings, JobClient, ReqwestJobClient};
use crate::poll::Poller;
use crate::request::read_prompt_file;
use crate::sink::{ChannelProgressSink, ProgressSink};
use crate::{EngineEvent, FailureKind, JobError, JobHandle, JobRequest};

enum EngineCommand {
    Task(EngineTask),
    StartPolling { job_id: String },
    CancelPolling,
    Shutdown,
}

/// Work that runs as its own task on the engine runtime.
enum EngineTask {
    ReadPrompt { cycle: u64, path: PathBuf },
    Submit { cycle: u64, request: JobRequest },
}

/// Front door to the engine thread. Commands run on a private tokio
/// runtime; results come back as [`EngineEvent`]s.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, JobError> {
        let client = ReqwestJobClient::new(settings.clone())?;
        Self::with_client(Arc::new(client), settings)
    }

    /// Fails if the runtime cannot be built; no thread is started then.
    pub fn with_client(
        client: Arc<dyn JobClient>,
        settings: ClientSettings,
    ) -> Result<Self, JobError> {
        let runtime = tokio::runtime::Runtime::new().map_err(|err| {
            JobError::new(
                FailureKind::Runtime,
                format!("failed to start engine runtime: {err}"),
            )
        })?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let _guard = runtime.enter();
            let poller = Poller::new(client.clone(), settings.poll_settings());
            let sink: Arc<dyn ProgressSink> = Arc::new(ChannelProgressSink::new(event_tx.clone()));

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Task(task) => {
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        let max_prompt_bytes = settings.max_prompt_file_bytes;
                        runtime.spawn(async move {
                            run_task(client.as_ref(), max_prompt_bytes, task, event_tx).await;
                        });
                    }
                    EngineCommand::StartPolling { job_id } => {
                        poller.start_polling(JobHandle::new(job_id), sink.clone());
                    }
                    EngineCommand::CancelPolling => {
                        poller.cancel_active();
                    }
                    EngineCommand::Shutdown => break,
                }
            }

            scout_debug!("Engine thread shutting down");
            poller.cancel_active();
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn read_prompt(&self, cycle: u64, path: impl Into<PathBuf>) {
        self.send(EngineCommand::Task(EngineTask::ReadPrompt {
            cycle,
            path: path.into(),
        }));
    }

    pub fn submit(&self, cycle: u64, request: JobRequest) {
        self.send(EngineCommand::Task(EngineTask::Submit { cycle, request }));
    }

    /// Starts polling `job_id`; a poll already running is cancelled first.
    pub fn start_polling(&self, job_id: impl Into<String>) {
        self.send(EngineCommand::StartPolling {
            job_id: job_id.into(),
        });
    }

    pub fn cancel_polling(&self) {
        self.send(EngineCommand::CancelPolling);
    }

    /// Stops the engine thread for every clone of this handle. Running polls
    /// are cancelled and the event channel disconnects once in-flight tasks
    /// are dropped.
    pub fn shutdown(&self) {
        self.send(EngineCommand::Shutdown);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .try_recv()
            .ok()
    }

    /// Waits for the next event. `Disconnected` means the engine thread is gone
    /// and no further events will arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError> {
        self.event_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv_timeout(timeout)
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            scout_warn!("Engine thread is not running; command dropped");
        }
    }
}

async fn run_task(
    client: &dyn JobClient,
    max_prompt_bytes: u64,
    task: EngineTask,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match task {
        EngineTask::ReadPrompt { cycle, path } => {
            let read =
                tokio::task::spawn_blocking(move || read_prompt_file(&path, max_prompt_bytes));
            let result = read
                .await
                .unwrap_or_else(|err| Err(JobError::new(FailureKind::FileRead, err.to_string())));
            let _ = event_tx.send(EngineEvent::PromptRead { cycle, result });
        }
        EngineTask::Submit { cycle, request } => {
            let result = client.submit(&request).await;
            let _ = event_tx.send(EngineEvent::Submitted { cycle, result });
        }
    }
}
