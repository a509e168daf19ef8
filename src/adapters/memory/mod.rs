//! In-memory repositories for tests and local runs.

mod sop_repository;
mod work_session_repository;

pub use sop_repository::InMemorySopRepository;
pub use work_session_repository::InMemoryWorkSessionRepository;
