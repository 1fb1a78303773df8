//! Fixed-interval status polling for a single job.
//!
//! Each [`Poller::start_polling`] call takes a fresh epoch. The shared gate
//! holds the one epoch that may still deliver updates; a poll task emits only
//! while holding the gate with its own epoch live. Cancelling clears the gate
//! under the same lock, so once [`PollCancel::cancel`] returns nothing from
//! that poll reaches the sink, even if a status request was already in flight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use scout_logging::{scout_debug, scout_info, scout_warn};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::client::JobClient;
use crate::sink::ProgressSink;
use crate::{EngineEvent, FailureKind, JobHandle, JobStatus};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// Upper bound on status queries; `None` means unbounded.
    pub max_attempts: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: None,
        }
    }
}

type Gate = Arc<Mutex<Option<u64>>>;

/// Stops one poll. Cloneable; every clone cancels the same poll.
#[derive(Debug, Clone)]
pub struct PollCancel {
    epoch: u64,
    token: CancellationToken,
    gate: Gate,
}

impl PollCancel {
    /// Stops the poll. No update is delivered after this returns. Idempotent.
    pub fn cancel(&self) {
        {
            let mut live = lock(&self.gate);
            if *live == Some(self.epoch) {
                *live = None;
            }
        }
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

pub struct Poller {
    client: Arc<dyn JobClient>,
    settings: PollSettings,
    next_epoch: AtomicU64,
    gate: Gate,
    active: Arc<Mutex<Option<PollCancel>>>,
}

impl Poller {
    pub fn new(client: Arc<dyn JobClient>, settings: PollSettings) -> Self {
        Self {
            client,
            settings,
            next_epoch: AtomicU64::new(0),
            gate: Arc::new(Mutex::new(None)),
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Starts polling `handle`, cancelling any poll this poller is running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_polling(&self, handle: JobHandle, sink: Arc<dyn ProgressSink>) -> PollCancel {
        let mut active = lock(&self.active);
        if let Some(previous) = active.take() {
            scout_info!("Cancelling poll epoch={} before restart", previous.epoch);
            previous.cancel();
        }

        let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed) + 1;
        *lock(&self.gate) = Some(epoch);
        let cancel = PollCancel {
            epoch,
            token: CancellationToken::new(),
            gate: self.gate.clone(),
        };
        *active = Some(cancel.clone());

        scout_info!(
            "Polling job_id={} epoch={} interval_ms={} max_attempts={:?}",
            handle.job_id,
            epoch,
            self.settings.interval.as_millis(),
            self.settings.max_attempts
        );
        tokio::spawn(run_poll(PollTask {
            client: self.client.clone(),
            settings: self.settings,
            handle,
            cancel: cancel.clone(),
            active: self.active.clone(),
            sink,
        }));

        cancel
    }

    /// Cancels the running poll, if any. Returns whether one was running.
    pub fn cancel_active(&self) -> bool {
        let previous = lock(&self.active).take();
        match previous {
            Some(cancel) => {
                scout_info!("Cancelling poll epoch={}", cancel.epoch);
                cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// True while some poll may still deliver updates.
    pub fn is_active(&self) -> bool {
        lock(&self.gate).is_some()
    }
}

struct PollTask {
    client: Arc<dyn JobClient>,
    settings: PollSettings,
    handle: JobHandle,
    cancel: PollCancel,
    active: Arc<Mutex<Option<PollCancel>>>,
    sink: Arc<dyn ProgressSink>,
}

async fn run_poll(task: PollTask) {
    let PollTask {
        client,
        settings,
        handle,
        cancel,
        active,
        sink,
    } = task;

    let interval = settings.interval.max(MIN_INTERVAL);
    // First query one interval after start, like a browser `setInterval`.
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut attempts: u32 = 0;

    loop {
        tokio::select! {
            _ = cancel.token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        attempts = attempts.saturating_add(1);
        let result = tokio::select! {
            _ = cancel.token.cancelled() => break,
            result = client.check_status(&handle) => result,
        };

        let status = match result {
            Ok(JobStatus::Pending { message })
                if settings.max_attempts.is_some_and(|max| attempts >= max) =>
            {
                scout_warn!(
                    "Giving up on job_id={} after {} checks (last status: {})",
                    handle.job_id,
                    attempts,
                    message
                );
                let kind = FailureKind::AttemptsExhausted { attempts };
                JobStatus::Failed {
                    reason: kind.to_string(),
                    kind,
                }
            }
            Ok(status) => status,
            Err(err) => {
                scout_warn!("Polling job_id={} failed: {}", handle.job_id, err);
                JobStatus::Failed {
                    reason: err.to_string(),
                    kind: err.kind,
                }
            }
        };

        let terminal = status.is_terminal();
        if !deliver(&cancel, &handle, status, sink.as_ref()) {
            scout_debug!(
                "Dropped late status for job_id={} epoch={}",
                handle.job_id,
                cancel.epoch
            );
            break;
        }
        if terminal {
            scout_info!(
                "Polling job_id={} finished after {} checks",
                handle.job_id,
                attempts
            );
            break;
        }
    }

    let mut slot = lock(&active);
    if slot.as_ref().map(PollCancel::epoch) == Some(cancel.epoch) {
        *slot = None;
    }
}

/// Emits `status` if this poll's epoch is still live. A terminal status
/// closes the gate in the same critical section.
fn deliver(
    cancel: &PollCancel,
    handle: &JobHandle,
    status: JobStatus,
    sink: &dyn ProgressSink,
) -> bool {
    let mut live = lock(&cancel.gate);
    if *live != Some(cancel.epoch) {
        return false;
    }
    if status.is_terminal() {
        *live = None;
    }
    sink.emit(EngineEvent::Status {
        job_id: handle.job_id.clone(),
        status,
    });
    true
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
