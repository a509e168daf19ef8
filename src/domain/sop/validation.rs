//! Structural validation of an SOP tree.
//!
//! `Sop::validate` reports every defect instead of failing fast, so the
//! caller decides policy: a draft may be saved with defects, a work session
//! may not be started from one.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::procedure::Sop;

/// A single structural defect. Task and step numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SopDefect {
    MissingTitle,
    NoTasks,
    TaskMissingTitle { task_number: usize },
    TaskWithoutSteps { task_number: usize, task_title: String },
    StepMissingDescription {
        task_number: usize,
        step_number: usize,
        task_title: String,
    },
}

impl fmt::Display for SopDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SopDefect::MissingTitle => write!(f, "SOP title is required"),
            SopDefect::NoTasks => write!(f, "SOP must have at least one task"),
            SopDefect::TaskMissingTitle { task_number } => {
                write!(f, "Task {} title is required", task_number)
            }
            SopDefect::TaskWithoutSteps { task_title, .. } => {
                write!(f, "Task '{}' must have at least one step", task_title)
            }
            SopDefect::StepMissingDescription {
                step_number,
                task_title,
                ..
            } => write!(
                f,
                "Step {} in task '{}' must have a description",
                step_number, task_title
            ),
        }
    }
}

impl Sop {
    /// Returns all structural defects; empty means the SOP is ready to run.
    pub fn validate(&self) -> Vec<SopDefect> {
        let mut defects = Vec::new();

        if self.title().trim().is_empty() {
            defects.push(SopDefect::MissingTitle);
        }

        if self.tasks().is_empty() {
            defects.push(SopDefect::NoTasks);
        }

        for (i, task) in self.tasks().iter().enumerate() {
            let task_number = i + 1;
            if task.title().trim().is_empty() {
                defects.push(SopDefect::TaskMissingTitle { task_number });
            }

            if task.steps().is_empty() {
                defects.push(SopDefect::TaskWithoutSteps {
                    task_number,
                    task_title: task.title().to_string(),
                });
            }

            for (j, step) in task.steps().iter().enumerate() {
                if step.description().trim().is_empty() {
                    defects.push(SopDefect::StepMissingDescription {
                        task_number,
                        step_number: j + 1,
                        task_title: task.title().to_string(),
                    });
                }
            }
        }

        defects
    }

    /// Returns true if `validate` reports no defects.
    pub fn is_structured(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SopId, StepId, TaskId, Timestamp, UserId};
    use crate::domain::sop::{Step, Task};

    fn author() -> UserId {
        UserId::new("author-1").unwrap()
    }

    fn raw_sop(title: &str, tasks: Vec<Task>) -> Sop {
        let now = Timestamp::now();
        Sop::reconstitute(SopId::new(), title.to_string(), author(), tasks, now, now, None)
    }

    fn raw_task(index: usize, title: &str, steps: Vec<Step>) -> Task {
        Task::reconstitute(TaskId::new(), title.to_string(), None, index, steps)
    }

    fn raw_step(index: usize, description: &str) -> Step {
        Step::reconstitute(StepId::new(), description.to_string(), index, None, None, vec![])
    }

    #[test]
    fn structured_sop_has_no_defects() {
        let mut sop = Sop::new("Valve lockout", author()).unwrap();
        sop.add_task("Isolate", None)
            .unwrap()
            .add_step("Close valve", None, None)
            .unwrap();

        assert!(sop.validate().is_empty());
        assert!(sop.is_structured());
    }

    #[test]
    fn empty_sop_reports_missing_tasks() {
        let sop = Sop::new("Valve lockout", author()).unwrap();
        assert_eq!(sop.validate(), vec![SopDefect::NoTasks]);
    }

    #[test]
    fn reports_every_defect_in_order() {
        let sop = raw_sop(
            " ",
            vec![
                raw_task(0, "", vec![raw_step(0, "ok")]),
                raw_task(1, "Drain", vec![]),
                raw_task(2, "Vent", vec![raw_step(0, "Open vent"), raw_step(1, "  ")]),
            ],
        );

        let messages: Vec<String> = sop.validate().iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "SOP title is required",
                "Task 1 title is required",
                "Task 'Drain' must have at least one step",
                "Step 2 in task 'Vent' must have a description",
            ]
        );
    }

    #[test]
    fn defects_serialize_with_kind_tag() {
        let json = serde_json::to_value(SopDefect::TaskMissingTitle { task_number: 3 }).unwrap();
        assert_eq!(json["kind"], "task_missing_title");
        assert_eq!(json["task_number"], 3);
    }
}
