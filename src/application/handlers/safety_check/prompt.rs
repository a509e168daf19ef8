//! Verification prompt sent to the safety judge.
//!
//! The judge sees the whole SOP so it can tell when a worker is ahead of
//! or behind the expected step.

use crate::domain::foundation::Timestamp;
use crate::domain::sop::{Sop, StepLocation};

const NOT_SPECIFIED: &str = "N/A";

/// Renders the full SOP as an indented outline.
///
/// ```text
/// SOP Title: Pump maintenance
///
/// Task 1: Isolate
///   Step 1.1: Close inlet valve
///     Action: Turn handle clockwise
///     Hazards:
///       - [high] Pressurised line
/// ```
pub fn sop_outline(sop: &Sop) -> String {
    let mut lines = vec![format!("SOP Title: {}", sop.title()), String::new()];
    for (ti, task) in sop.tasks().iter().enumerate() {
        lines.push(format!("Task {}: {}", ti + 1, task.title()));
        if let Some(description) = task.description() {
            lines.push(format!("  Description: {}", description));
        }
        for (si, step) in task.steps().iter().enumerate() {
            lines.push(format!("  Step {}.{}: {}", ti + 1, si + 1, step.description()));
            if let Some(action) = step.expected_action() {
                lines.push(format!("    Action: {}", action));
            }
            if let Some(result) = step.expected_result() {
                lines.push(format!("    Result: {}", result));
            }
            if !step.hazards().is_empty() {
                lines.push("    Hazards:".to_string());
                for hazard in step.hazards() {
                    lines.push(format!(
                        "      - [{}] {}",
                        hazard.severity(),
                        hazard.description()
                    ));
                }
            }
        }
    }
    lines.join("\n")
}

/// Builds the prompt for verifying one step.
pub fn verification_prompt(
    sop: &Sop,
    location: &StepLocation<'_>,
    transcript: &str,
    submitted_at: &Timestamp,
) -> String {
    let step = location.step;
    let hazards = step
        .hazards()
        .iter()
        .map(|h| format!("{}: {}", h.severity(), h.description()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are verifying that a worker correctly performed a safety step.

**Complete SOP Workflow:**
{outline}

**Current Expected Step (Task {task_number}, Step {step_number}):**
{description}
Expected action: {action}
Expected result: {result}
Known hazards: {hazards}

**Worker Evidence:**
- Audio transcript: "{transcript}"
- Image: [provided]
- Timestamp: {timestamp}

**Analysis Required:**
1. Did the worker perform the correct action for THIS step?
2. Does the image show the expected result for THIS step?
3. Did the worker verbally confirm the check? (e.g., "バルブ閉ヨシッ!")
4. Are there any visible safety concerns in the image?
5. Based on the complete workflow, is the worker on the correct step?

Answer with JSON matching the provided schema. Write feedback_text in
Japanese: praise on pass, a specific correction on fail.

**Guidelines:**
- Be strict with safety-critical steps
- If the worker appears to be on the wrong step, set step_sequence_correct=false and say which step comes next
- Praise good practice (e.g., "しっかり確認できました！")
- Give specific corrections for failures (e.g., "バルブがまだ開いています。もう一度確認してください")
- Consider both visual and audio evidence"#,
        outline = sop_outline(sop),
        task_number = location.task_number,
        step_number = location.step_number,
        description = step.description(),
        action = step.expected_action().unwrap_or(NOT_SPECIFIED),
        result = step.expected_result().unwrap_or(NOT_SPECIFIED),
        hazards = if hazards.is_empty() {
            "None specified"
        } else {
            hazards.as_str()
        },
        transcript = transcript,
        timestamp = submitted_at,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::pump_sop;

    #[test]
    fn outline_lists_every_task_step_and_hazard() {
        let (sop, _) = pump_sop();
        let outline = sop_outline(&sop);

        assert!(outline.starts_with("SOP Title: Pump maintenance"));
        assert!(outline.contains("Task 1: Isolate\n  Description: Isolate the pump"));
        assert!(outline.contains("  Step 1.1: Close inlet valve\n    Action: Turn handle clockwise"));
        assert!(outline.contains("      - [high] Pressurised line"));
        assert!(outline.contains("Task 2: Drain\n  Step 2.1: Open drain"));
    }

    #[test]
    fn prompt_targets_the_located_step() {
        let (sop, steps) = pump_sop();
        let location = sop.locate_step(&steps[0]).unwrap();

        let prompt = verification_prompt(&sop, &location, "バルブ閉ヨシッ！", &Timestamp::now());

        assert!(prompt.contains("(Task 1, Step 1)"));
        assert!(prompt.contains("Expected result: Handle perpendicular to pipe"));
        assert!(prompt.contains("Known hazards: high: Pressurised line"));
        assert!(prompt.contains("Audio transcript: \"バルブ閉ヨシッ！\""));
    }

    #[test]
    fn missing_expectations_are_marked() {
        let (sop, steps) = pump_sop();
        let location = sop.locate_step(&steps[2]).unwrap();

        let prompt = verification_prompt(&sop, &location, "", &Timestamp::now());

        assert!(prompt.contains("(Task 2, Step 1)"));
        assert!(prompt.contains("Expected action: N/A"));
        assert!(prompt.contains("Known hazards: None specified"));
    }
}
