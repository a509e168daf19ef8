//! Yoshikosan - safety verification for industrial work procedures
//!
//! Workers step through a Standard Operating Procedure while an AI judge
//! verifies each step from a photo and a spoken confirmation. Every
//! verdict is recorded on a work session as an audit trail that a
//! supervisor finally approves or rejects, locking the record.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
