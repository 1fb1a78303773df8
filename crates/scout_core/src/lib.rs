//! Scout core: pure search-session state machine and view-model helpers.
mod effect;
mod msg;
mod state;
pub mod text;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, Candidate, Cycle, JobStatus, SessionState};
pub use update::update;
pub use view_model::{AppViewModel, CandidateRowView};
