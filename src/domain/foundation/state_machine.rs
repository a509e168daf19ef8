//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions across lifecycle statuses.

use super::DomainError;

/// Trait for status enums that represent state machines.
///
/// Implementors define the legal edges; validated transitions and the
/// terminal check come for free.
///
/// # Example
///
/// ```ignore
/// let next = WorkSessionStatus::InProgress.transition_to(WorkSessionStatus::Paused)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug + std::fmt::Display {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::invalid_transition(format!(
                "Cannot transition from {} to {}",
                self, target
            ))
            .with_detail("from", self.to_string())
            .with_detail("to", target.to_string()))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use std::fmt;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Lamp {
        Off,
        On,
        Broken,
    }

    impl fmt::Display for Lamp {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl StateMachine for Lamp {
        fn can_transition_to(&self, target: &Self) -> bool {
            use Lamp::*;
            matches!((self, target), (Off, On) | (On, Off) | (On, Broken))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use Lamp::*;
            match self {
                Off => vec![On],
                On => vec![Off, Broken],
                Broken => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_edge() {
        assert_eq!(Lamp::Off.transition_to(Lamp::On), Ok(Lamp::On));
    }

    #[test]
    fn transition_to_fails_with_state_error() {
        let err = Lamp::Off.transition_to(Lamp::Broken).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(err.message, "Cannot transition from Off to Broken");
    }

    #[test]
    fn terminal_state_has_no_edges() {
        assert!(Lamp::Broken.is_terminal());
        assert!(!Lamp::On.is_terminal());
    }
}
