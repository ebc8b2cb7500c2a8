//! Authorization policy
//!
//! Callers arrive already authenticated; this module only decides whether a
//! given role may perform a given operation. Every role check in the
//! services goes through [`require`] so the policy lives in one place.

use crate::models::user::Role;
use crate::utils::errors::{Result, VsmError};

/// Operations gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create, update or delete events
    ManageEvents,
    /// View the full registration list of an event
    ViewEventRegistrations,
    /// Change a registration's status on behalf of an applicant
    UpdateRegistrationStatus,
    /// View registration statistics
    ViewRegistrationStats,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ManageEvents => "manage_events",
            Operation::ViewEventRegistrations => "view_event_registrations",
            Operation::UpdateRegistrationStatus => "update_registration_status",
            Operation::ViewRegistrationStats => "view_registration_stats",
        }
    }
}

/// Check whether a role is allowed to perform an operation
pub fn is_allowed(operation: Operation, role: Role) -> bool {
    match operation {
        Operation::ManageEvents
        | Operation::ViewEventRegistrations
        | Operation::UpdateRegistrationStatus
        | Operation::ViewRegistrationStats => {
            matches!(role, Role::Editor | Role::Admin)
        }
    }
}

/// Require permission for an operation or fail with `PermissionDenied`
pub fn require(operation: Operation, role: Role) -> Result<()> {
    if is_allowed(operation, role) {
        return Ok(());
    }

    Err(VsmError::PermissionDenied(format!(
        "Role {} may not perform {}",
        role,
        operation.as_str()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::ErrorKind;

    const ALL_OPERATIONS: [Operation; 4] = [
        Operation::ManageEvents,
        Operation::ViewEventRegistrations,
        Operation::UpdateRegistrationStatus,
        Operation::ViewRegistrationStats,
    ];

    #[test]
    fn test_plain_users_hold_no_elevated_capability() {
        for op in ALL_OPERATIONS {
            assert!(!is_allowed(op, Role::User), "{:?} allowed for USER", op);
        }
    }

    #[test]
    fn test_editors_and_admins_hold_all_capabilities() {
        for op in ALL_OPERATIONS {
            assert!(is_allowed(op, Role::Editor), "{:?} denied for EDITOR", op);
            assert!(is_allowed(op, Role::Admin), "{:?} denied for ADMIN", op);
        }
    }

    #[test]
    fn test_require_returns_forbidden() {
        let err = require(Operation::UpdateRegistrationStatus, Role::User).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        assert!(require(Operation::UpdateRegistrationStatus, Role::Editor).is_ok());
    }
}
