//! WorkSessionStatus enum for tracking the lifecycle of a work session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a work session.
///
/// ```text
///              ┌──────── pause ───────┐
///              ▼                      │
///   start → InProgress ◄── resume ── Paused
///              │  │                   │
///     complete │  └────── abort ──────┴──► Aborted
///              ▼
///          Completed ──approve──► Approved (locked)
///              └──────reject────► Rejected (locked)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkSessionStatus {
    #[default]
    InProgress,
    Paused,
    Completed,
    Aborted,
    Approved,
    Rejected,
}

impl WorkSessionStatus {
    /// All statuses, for exhaustive table tests.
    pub const ALL: [WorkSessionStatus; 6] = [
        WorkSessionStatus::InProgress,
        WorkSessionStatus::Paused,
        WorkSessionStatus::Completed,
        WorkSessionStatus::Aborted,
        WorkSessionStatus::Approved,
        WorkSessionStatus::Rejected,
    ];

    /// Returns the snake_case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkSessionStatus::InProgress => "in_progress",
            WorkSessionStatus::Paused => "paused",
            WorkSessionStatus::Completed => "completed",
            WorkSessionStatus::Aborted => "aborted",
            WorkSessionStatus::Approved => "approved",
            WorkSessionStatus::Rejected => "rejected",
        }
    }

    /// Returns true if the worker is still executing the SOP.
    pub fn is_active(&self) -> bool {
        matches!(self, WorkSessionStatus::InProgress | WorkSessionStatus::Paused)
    }

    /// Returns true once a supervisor has disposed of the session.
    pub fn is_disposed(&self) -> bool {
        matches!(self, WorkSessionStatus::Approved | WorkSessionStatus::Rejected)
    }
}

impl StateMachine for WorkSessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use WorkSessionStatus::*;
        matches!(
            (self, target),
            (InProgress, Paused)
                | (Paused, InProgress)
                | (InProgress, Aborted)
                | (Paused, Aborted)
                | (InProgress, Completed)
                | (Completed, Approved)
                | (Completed, Rejected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use WorkSessionStatus::*;
        match self {
            InProgress => vec![Paused, Aborted, Completed],
            Paused => vec![InProgress, Aborted],
            Completed => vec![Approved, Rejected],
            Aborted | Approved | Rejected => vec![],
        }
    }
}

impl fmt::Display for WorkSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
