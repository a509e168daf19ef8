//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, roles, events)
//! - `sop` - Standard Operating Procedure tree, validation and step navigation
//! - `work_session` - Work session aggregate, safety checks and lifecycle events

pub mod foundation;
pub mod sop;
pub mod work_session;
