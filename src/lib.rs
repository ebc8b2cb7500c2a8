//! VSM Backend
//!
//! Backend core for the Vietnam Student Marathon platform. This library
//! provides the event registration admission workflow (capacity, waitlist
//! and participant counter management) together with the event authoring,
//! storage and authorization plumbing it depends on. The HTTP surface,
//! authentication token issuance, email delivery and object storage are
//! external collaborators and intentionally absent.

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ErrorKind, Result, VsmError};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use models::{RegistrationStats, RegistrationStatus, Role};
pub use services::{EventService, RegistrationService, ServiceFactory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
