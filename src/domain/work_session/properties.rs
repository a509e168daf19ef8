//! Property tests for the WorkSession state machine.
//!
//! Random operation sequences are replayed against a session and checked
//! against the transition table, the locked rule and the append-only audit
//! trail.

use proptest::prelude::*;

use super::{CheckResult, CheckSubmission, WorkSession, WorkSessionStatus};
use crate::domain::foundation::{DomainError, StepId, Timestamp, UserId};
use crate::domain::sop::Sop;

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Pause,
    Resume,
    Abort,
    AddCheck { step: usize, pass: bool },
    Advance(Option<usize>),
    Complete,
    Approve,
    Reject { with_reason: bool },
    OverrideFirst,
    OverrideLast,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Pause),
        Just(Op::Resume),
        Just(Op::Abort),
        (0usize..3, any::<bool>()).prop_map(|(step, pass)| Op::AddCheck { step, pass }),
        prop::option::of(0usize..3).prop_map(Op::Advance),
        Just(Op::Complete),
        Just(Op::Approve),
        any::<bool>().prop_map(|with_reason| Op::Reject { with_reason }),
        Just(Op::OverrideFirst),
        Just(Op::OverrideLast),
    ]
}

fn fixture() -> (WorkSession, Vec<StepId>) {
    let mut sop = Sop::new("Boiler inspection", UserId::new("author").unwrap()).unwrap();
    let task = sop.add_task("Inspect", None).unwrap();
    let mut steps = Vec::new();
    for description in ["Check gauge", "Check valve", "Check seal"] {
        steps.push(*task.add_step(description, None, None).unwrap().id());
    }
    let session = WorkSession::start(&sop, UserId::new("worker").unwrap()).unwrap();
    (session, steps)
}

fn apply(session: &mut WorkSession, op: &Op, steps: &[StepId]) -> Result<(), DomainError> {
    let supervisor = UserId::new("supervisor").unwrap();
    match op {
        Op::Pause => session.pause(),
        Op::Resume => session.resume(),
        Op::Abort => session.abort(Some("stopped".into())),
        Op::AddCheck { step, pass } => {
            let result = if *pass { CheckResult::Pass } else { CheckResult::Fail };
            session
                .add_check(CheckSubmission::new(steps[*step], result, "feedback"))
                .map(|_| ())
        }
        Op::Advance(next) => session.advance_to_next_step(next.map(|i| steps[i])),
        Op::Complete => session.complete(),
        Op::Approve => session.approve(&supervisor),
        Op::Reject { with_reason } => {
            session.reject(&supervisor, if *with_reason { "bad form" } else { "" })
        }
        Op::OverrideFirst => match session.checks().first().map(|c| *c.id()) {
            Some(id) => session.override_check(&id, "supervisor review", &supervisor),
            None => session.override_last_check("supervisor review", &supervisor),
        },
        Op::OverrideLast => session.override_last_check("supervisor review", &supervisor),
    }
}

/// Whether the transition table allows `op` from the session's current state.
fn table_allows(session: &WorkSession, op: &Op) -> bool {
    use WorkSessionStatus::*;
    let status = session.status();
    match op {
        Op::Pause => status == InProgress,
        Op::Resume => status == Paused,
        Op::Abort => matches!(status, InProgress | Paused),
        Op::AddCheck { .. } | Op::Advance(_) | Op::Complete => status == InProgress,
        Op::Approve => status == Completed,
        Op::Reject { with_reason } => status == Completed && *with_reason,
        Op::OverrideFirst | Op::OverrideLast => {
            !session.is_locked() && !session.checks().is_empty()
        }
    }
}

/// The parts of a check no operation may ever change.
fn evidence(session: &WorkSession) -> Vec<(StepId, String, Timestamp)> {
    session
        .checks()
        .iter()
        .map(|c| (*c.step_id(), c.feedback_text().to_string(), *c.checked_at()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: an operation succeeds exactly when the transition table
    /// allows it, and a rejected operation changes nothing.
    #[test]
    fn prop_transition_table_is_complete(ops in prop::collection::vec(arb_op(), 0..40)) {
        let (mut session, steps) = fixture();
        for op in &ops {
            let allowed = table_allows(&session, op);
            let before = session.clone();
            let result = apply(&mut session, op, &steps);
            prop_assert_eq!(result.is_ok(), allowed, "{:?} from {}", op, before.status());
            if result.is_err() {
                prop_assert_eq!(&session, &before);
            }
        }
    }

    /// Property: once locked, every mutation fails and the session is frozen.
    #[test]
    fn prop_locked_sessions_are_immutable(
        approve in any::<bool>(),
        ops in prop::collection::vec(arb_op(), 1..30),
    ) {
        let (mut session, steps) = fixture();
        session.add_check(CheckSubmission::new(steps[0], CheckResult::Pass, "ok")).unwrap();
        session.complete().unwrap();
        if approve {
            session.approve(&UserId::new("sup").unwrap()).unwrap();
        } else {
            session.reject(&UserId::new("sup").unwrap(), "redo").unwrap();
        }
        let frozen = session.clone();

        for op in &ops {
            let err = apply(&mut session, op, &steps).unwrap_err();
            prop_assert_eq!(err.message.as_str(), super::LOCKED_MESSAGE);
            prop_assert_eq!(&session, &frozen);
        }
    }

    /// Property: checks are never removed or reordered, and their evidence
    /// fields never change. Only overrides touch an existing check.
    #[test]
    fn prop_audit_trail_is_append_only(ops in prop::collection::vec(arb_op(), 0..40)) {
        let (mut session, steps) = fixture();
        for op in &ops {
            let before = evidence(&session);
            let results_before: Vec<CheckResult> =
                session.checks().iter().map(|c| c.result()).collect();

            let _ = apply(&mut session, op, &steps);

            let after = evidence(&session);
            prop_assert!(after.len() >= before.len());
            prop_assert_eq!(&after[..before.len()], before.as_slice());

            let is_override = matches!(op, Op::OverrideFirst | Op::OverrideLast);
            for (check, old) in session.checks().iter().zip(&results_before) {
                if !is_override {
                    prop_assert_eq!(check.result(), *old);
                }
            }
        }
    }

    /// Property: every reachable session survives a trip through its stored form.
    #[test]
    fn prop_reachable_sessions_reload(ops in prop::collection::vec(arb_op(), 0..40)) {
        let (mut session, steps) = fixture();
        for op in &ops {
            let _ = apply(&mut session, op, &steps);
        }
        let json = serde_json::to_value(&session).unwrap();
        let restored: WorkSession = serde_json::from_value(json).unwrap();
        prop_assert_eq!(restored, session);
    }

    /// Property: locked is set exactly for approved and rejected sessions.
    #[test]
    fn prop_locked_matches_disposed_status(ops in prop::collection::vec(arb_op(), 0..40)) {
        let (mut session, steps) = fixture();
        for op in &ops {
            let _ = apply(&mut session, op, &steps);
            prop_assert_eq!(session.is_locked(), session.status().is_disposed());
        }
    }
}
