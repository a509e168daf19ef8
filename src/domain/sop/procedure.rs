//! SOP aggregate: an ordered Task → Step → Hazard tree.
//!
//! The tree is authored elsewhere and treated as read-only by work
//! sessions. `order_index` values are dense and zero based, assigned at
//! append time.

use serde::{Deserialize, Serialize};

use super::hazard::{Hazard, HazardSeverity};
use crate::domain::foundation::{
    require_non_empty, SopId, StepId, TaskId, Timestamp, UserId, ValidationError,
};

/// A single verifiable action within a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    id: StepId,
    description: String,
    order_index: usize,
    expected_action: Option<String>,
    expected_result: Option<String>,
    hazards: Vec<Hazard>,
}

impl Step {
    /// Reconstitute a step from persistence (no validation).
    pub fn reconstitute(
        id: StepId,
        description: String,
        order_index: usize,
        expected_action: Option<String>,
        expected_result: Option<String>,
        hazards: Vec<Hazard>,
    ) -> Self {
        Self {
            id,
            description,
            order_index,
            expected_action,
            expected_result,
            hazards,
        }
    }

    pub fn id(&self) -> &StepId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn order_index(&self) -> usize {
        self.order_index
    }

    pub fn expected_action(&self) -> Option<&str> {
        self.expected_action.as_deref()
    }

    pub fn expected_result(&self) -> Option<&str> {
        self.expected_result.as_deref()
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    /// Attach a hazard to this step.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the description is blank
    pub fn add_hazard(
        &mut self,
        description: impl Into<String>,
        severity: HazardSeverity,
        mitigation: Option<String>,
    ) -> Result<&Hazard, ValidationError> {
        let hazard = Hazard::new(description, severity, mitigation)?;
        self.hazards.push(hazard);
        Ok(&self.hazards[self.hazards.len() - 1])
    }
}

/// A titled group of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    order_index: usize,
    steps: Vec<Step>,
}

impl Task {
    /// Reconstitute a task from persistence (no validation).
    pub fn reconstitute(
        id: TaskId,
        title: String,
        description: Option<String>,
        order_index: usize,
        steps: Vec<Step>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            order_index,
            steps,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn order_index(&self) -> usize {
        self.order_index
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Append a step; its `order_index` is the current step count.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the description is blank
    pub fn add_step(
        &mut self,
        description: impl Into<String>,
        expected_action: Option<String>,
        expected_result: Option<String>,
    ) -> Result<&mut Step, ValidationError> {
        let description = description.into();
        require_non_empty("step.description", &description)?;

        let order_index = self.steps.len();
        self.steps.push(Step {
            id: StepId::new(),
            description,
            order_index,
            expected_action,
            expected_result,
            hazards: Vec::new(),
        });
        Ok(&mut self.steps[order_index])
    }
}

/// Standard Operating Procedure aggregate.
///
/// # Invariants
///
/// - `tasks[i].order_index == i`
/// - `tasks[i].steps[j].order_index == j`
/// - No operation reorders or removes tasks or steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sop {
    id: SopId,
    title: String,
    created_by: UserId,
    tasks: Vec<Task>,
    created_at: Timestamp,
    updated_at: Timestamp,
    deleted_at: Option<Timestamp>,
}

impl Sop {
    /// Create an empty SOP.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the title is blank
    pub fn new(title: impl Into<String>, created_by: UserId) -> Result<Self, ValidationError> {
        let title = title.into();
        require_non_empty("title", &title)?;

        let now = Timestamp::now();
        Ok(Self {
            id: SopId::new(),
            title,
            created_by,
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Reconstitute an SOP from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SopId,
        title: String,
        created_by: UserId,
        tasks: Vec<Task>,
        created_at: Timestamp,
        updated_at: Timestamp,
        deleted_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            title,
            created_by,
            tasks,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SopId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn deleted_at(&self) -> Option<&Timestamp> {
        self.deleted_at.as_ref()
    }

    /// Returns true once the SOP has been soft deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a task; its `order_index` is the current task count.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the title is blank
    pub fn add_task(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<&mut Task, ValidationError> {
        let title = title.into();
        require_non_empty("task.title", &title)?;

        let order_index = self.tasks.len();
        self.tasks.push(Task {
            id: TaskId::new(),
            title,
            description,
            order_index,
            steps: Vec::new(),
        });
        self.updated_at = Timestamp::now();
        Ok(&mut self.tasks[order_index])
    }

    /// Soft delete. Idempotent: the first deletion time is kept.
    pub fn mark_deleted(&mut self) {
        if self.deleted_at.is_none() {
            let now = Timestamp::now();
            self.deleted_at = Some(now);
            self.updated_at = now;
        }
    }
}
