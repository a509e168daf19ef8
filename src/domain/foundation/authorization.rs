//! Authorization support types.
//!
//! Ownership and role decisions are made at the application boundary.
//! Aggregates never inspect the caller; handlers build an [`Actor`] from the
//! authenticated request and ask it for a capability before mutating
//! anything.
//!
//! # Roles
//!
//! - `Worker` - executes SOPs and may only act on sessions they own
//! - `Supervisor` - reviews completed sessions and overrides checks

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DomainError, ErrorCode, UserId};

/// Role carried by an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Worker,
    Supervisor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Worker => "worker",
            Role::Supervisor => "supervisor",
        };
        write!(f, "{}", s)
    }
}

/// The authenticated caller of a use case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    /// Creates an actor with the worker role.
    pub fn worker(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Worker,
        }
    }

    /// Creates an actor with the supervisor role.
    pub fn supervisor(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Supervisor,
        }
    }

    /// Returns true if the actor holds the supervisor role.
    pub fn is_supervisor(&self) -> bool {
        self.role == Role::Supervisor
    }

    /// Requires the supervisor role for `action`.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the actor is not a supervisor
    pub fn require_supervisor(&self, action: &str) -> Result<(), DomainError> {
        if self.is_supervisor() {
            Ok(())
        } else {
            Err(
                DomainError::new(ErrorCode::Forbidden, format!("Only supervisors may {}", action))
                    .with_detail("user_id", self.user_id.to_string())
                    .with_detail("role", self.role.to_string()),
            )
        }
    }

    /// Requires that the actor owns the resource.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if `owner` is a different user
    pub fn require_owner(&self, owner: &UserId, resource_type: &str) -> Result<(), DomainError> {
        if &self.user_id == owner {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                format!("Not authorized to modify this {}", resource_type),
            )
            .with_detail("user_id", self.user_id.to_string()))
        }
    }

    /// Requires ownership, or the supervisor role for read access.
    pub fn require_owner_or_supervisor(
        &self,
        owner: &UserId,
        resource_type: &str,
    ) -> Result<(), DomainError> {
        if self.is_supervisor() {
            return Ok(());
        }
        self.require_owner(owner, resource_type)
    }
}
