//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{DatabasePool, EventRepository, RegistrationRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Access the underlying connection pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}
