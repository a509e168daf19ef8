//! Worker-facing session lifecycle handlers and queries.

mod abort_session;
mod complete_session;
mod get_current_session;
mod get_session;
mod list_worker_sessions;
mod pause_session;
mod resume_session;
mod start_session;

pub use abort_session::{AbortSessionCommand, AbortSessionHandler, AbortSessionResult};
pub use complete_session::{CompleteSessionCommand, CompleteSessionHandler, CompleteSessionResult};
pub use get_current_session::{GetCurrentSessionHandler, GetCurrentSessionQuery};
pub use get_session::{GetWorkSessionHandler, GetWorkSessionQuery};
pub use list_worker_sessions::{ListWorkerSessionsHandler, ListWorkerSessionsQuery};
pub use pause_session::{PauseSessionCommand, PauseSessionHandler, PauseSessionResult};
pub use resume_session::{ResumeSessionCommand, ResumeSessionHandler, ResumeSessionResult};
pub use start_session::{StartSessionCommand, StartSessionHandler, StartSessionResult};
