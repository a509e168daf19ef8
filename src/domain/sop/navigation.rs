//! Step navigation over the flattened (task, step) sequence.
//!
//! Tasks are concatenated in order and their steps form one global linear
//! sequence. Everything here is recomputed from the tree on each call;
//! nothing is cached.

use super::procedure::{Sop, Step, Task};
use crate::domain::foundation::StepId;

/// Where a step sits inside its SOP. Numbers are 1-based for display.
#[derive(Debug, Clone, Copy)]
pub struct StepLocation<'a> {
    pub task_number: usize,
    pub step_number: usize,
    pub task: &'a Task,
    pub step: &'a Step,
}

impl Sop {
    /// Iterates all steps in execution order with their owning task.
    pub fn steps(&self) -> impl Iterator<Item = (&Task, &Step)> + '_ {
        self.tasks()
            .iter()
            .flat_map(|task| task.steps().iter().map(move |step| (task, step)))
    }

    /// Total number of steps across all tasks.
    pub fn total_steps(&self) -> usize {
        self.tasks().iter().map(|t| t.steps().len()).sum()
    }

    /// The first step of the first task, if any.
    pub fn first_step_id(&self) -> Option<StepId> {
        self.steps().next().map(|(_, step)| *step.id())
    }

    /// The step immediately after `current` in execution order.
    ///
    /// Returns `None` after the last step of the last task, and also when
    /// `current` is not part of this SOP; use [`Sop::locate_step`] first if
    /// the two cases must be told apart.
    pub fn next_step_id(&self, current: &StepId) -> Option<StepId> {
        let mut steps = self.steps().map(|(_, step)| step.id());
        steps.find(|id| *id == current)?;
        steps.next().copied()
    }

    /// Finds a step and its 1-based position.
    pub fn locate_step(&self, step_id: &StepId) -> Option<StepLocation<'_>> {
        self.tasks().iter().enumerate().find_map(|(ti, task)| {
            task.steps()
                .iter()
                .enumerate()
                .find(|(_, step)| step.id() == step_id)
                .map(|(si, step)| StepLocation {
                    task_number: ti + 1,
                    step_number: si + 1,
                    task,
                    step,
                })
        })
    }
}
