//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod event;
pub mod registration;
pub mod user;

// Re-export commonly used models
pub use event::{CreateEventRequest, Event, EventSummary, UpdateEventRequest};
pub use registration::{
    ExperienceLevel, RegisterEventRequest, Registration, RegistrationStats, RegistrationStatus,
    RegistrationWithEvent, RegistrationWithUser,
};
pub use user::{CreateUserRequest, Role, User, UserSummary};
