//! Error handling for the VSM backend
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for VSM backend operations
#[derive(Error, Debug)]
pub enum VsmError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: Uuid },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: Uuid },

    #[error("Registration not found: {registration_id}")]
    RegistrationNotFound { registration_id: Uuid },

    #[error("Already registered for event {event_id}")]
    AlreadyRegistered { event_id: Uuid },

    #[error("Event is not published: {event_id}")]
    EventNotPublished { event_id: Uuid },

    #[error("Registration deadline has passed for event {event_id}")]
    DeadlinePassed { event_id: Uuid },

    #[error("Event has already occurred: {event_id}")]
    EventAlreadyOccurred { event_id: Uuid },

    #[error("Registration status unchanged: {status}")]
    StatusUnchanged { status: String },

    #[error("Invalid registration status: {0}")]
    InvalidStatus(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for VSM backend operations
pub type Result<T> = std::result::Result<T, VsmError>;

impl VsmError {
    /// Classify the error into the caller-facing taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            VsmError::Database(_) => ErrorKind::StoreUnavailable,
            VsmError::Migration(_) => ErrorKind::StoreUnavailable,
            VsmError::Config(_) => ErrorKind::Internal,
            VsmError::PermissionDenied(_) => ErrorKind::Forbidden,
            VsmError::UserNotFound { .. } => ErrorKind::NotFound,
            VsmError::EventNotFound { .. } => ErrorKind::NotFound,
            VsmError::RegistrationNotFound { .. } => ErrorKind::NotFound,
            VsmError::AlreadyRegistered { .. } => ErrorKind::Conflict,
            VsmError::EventNotPublished { .. } => ErrorKind::InvalidState,
            VsmError::DeadlinePassed { .. } => ErrorKind::InvalidState,
            VsmError::EventAlreadyOccurred { .. } => ErrorKind::InvalidState,
            VsmError::StatusUnchanged { .. } => ErrorKind::InvalidState,
            VsmError::InvalidStatus(_) => ErrorKind::InvalidArgument,
            VsmError::Serialization(_) => ErrorKind::Internal,
            VsmError::InvalidInput(_) => ErrorKind::InvalidArgument,
        }
    }

    /// Check if the error reflects a caller mistake rather than a system fault
    pub fn is_caller_error(&self) -> bool {
        !matches!(self.kind(), ErrorKind::StoreUnavailable | ErrorKind::Internal)
    }
}

/// Caller-facing error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidState,
    InvalidArgument,
    Forbidden,
    StoreUnavailable,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "NOT_FOUND"),
            ErrorKind::Conflict => write!(f, "CONFLICT"),
            ErrorKind::InvalidState => write!(f, "INVALID_STATE"),
            ErrorKind::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorKind::Forbidden => write!(f, "FORBIDDEN"),
            ErrorKind::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            ErrorKind::Internal => write!(f, "INTERNAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_errors_are_distinguished_from_store_faults() {
        let event_id = Uuid::new_v4();
        assert_eq!(
            VsmError::AlreadyRegistered { event_id }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            VsmError::EventNotFound { event_id }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            VsmError::DeadlinePassed { event_id }.kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            VsmError::InvalidStatus("FOO".to_string()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            VsmError::PermissionDenied("nope".to_string()).kind(),
            ErrorKind::Forbidden
        );

        let store_fault = VsmError::Database(sqlx::Error::PoolClosed);
        assert_eq!(store_fault.kind(), ErrorKind::StoreUnavailable);
        assert!(!store_fault.is_caller_error());
        assert!(VsmError::StatusUnchanged { status: "PENDING".to_string() }.is_caller_error());
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::Conflict.to_string(), "CONFLICT");
        assert_eq!(ErrorKind::StoreUnavailable.to_string(), "STORE_UNAVAILABLE");
    }
}
