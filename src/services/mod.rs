//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod event;
pub mod registration;

// Re-export commonly used services
pub use auth::{is_allowed, require, Operation};
pub use event::EventService;
pub use registration::{counter_delta, decide_status, RegistrationService, CAPACITY_BUFFER};

use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub event_service: EventService,
    pub registration_service: RegistrationService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory over an initialized database service
    pub fn new(database: &DatabaseService) -> Self {
        let event_service = EventService::new(database.events.clone());
        let registration_service = RegistrationService::new(
            database.pool().clone(),
            database.events.clone(),
            database.registrations.clone(),
        );

        Self {
            event_service,
            registration_service,
        }
    }
}
