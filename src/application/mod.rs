//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers load the session, authorize the actor, apply exactly
//! one aggregate operation, save, and publish. Query handlers only read.

pub mod handlers;

pub use handlers::*;
