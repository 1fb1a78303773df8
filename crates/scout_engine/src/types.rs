use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a job created on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    pub job_id: String,
}

impl JobHandle {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub name: Option<String>,
    pub link: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Job accepted but not finished; `message` is the progress fragment.
    Pending { message: String },
    Complete { candidates: Vec<Candidate> },
    Failed { kind: FailureKind, reason: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PromptRead {
        cycle: u64,
        result: Result<String, JobError>,
    },
    Submitted {
        cycle: u64,
        result: Result<JobHandle, JobError>,
    },
    Status {
        job_id: String,
        status: JobStatus,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct JobError {
    pub kind: FailureKind,
    pub message: String,
}

impl JobError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    EmptyInput,
    FileRead,
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedResponse,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    AttemptsExhausted { attempts: u32 },
    Runtime,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::EmptyInput => write!(f, "empty input"),
            FailureKind::FileRead => write!(f, "file read error"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::AttemptsExhausted { attempts } => {
                write!(f, "job still pending after {attempts} status checks")
            }
            FailureKind::Runtime => write!(f, "runtime error"),
        }
    }
}
