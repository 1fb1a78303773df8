//! Scout engine: job service client, status poller and file IO.
mod client;
mod decode;
mod engine;
mod persist;
mod poll;
mod request;
mod sink;
mod types;

pub use client::{progress_fragment, ClientSettings, JobClient, ReqwestJobClient, DEFAULT_PROGRESS};
pub use decode::{decode_text, DecodeError, DecodedText};
pub use engine::EngineHandle;
pub use persist::{write_atomically, PersistError};
pub use poll::{PollCancel, PollSettings, Poller};
pub use request::{read_prompt_file, JobRequest};
pub use sink::{ChannelProgressSink, ProgressSink};
pub use types::{Candidate, EngineEvent, FailureKind, JobError, JobHandle, JobStatus};
