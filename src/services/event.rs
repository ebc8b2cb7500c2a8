//! Event service implementation
//!
//! Event authoring glue around the event repository. Admission itself
//! lives in the registration service; this service only creates and
//! maintains the events it admits against.

use tracing::{debug, info};
use uuid::Uuid;

use crate::database::EventRepository;
use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::models::user::Role;
use crate::services::auth::{self, Operation};
use crate::utils::errors::{Result, VsmError};
use crate::utils::logging::log_admin_action;

#[derive(Debug, Clone)]
pub struct EventService {
    events: EventRepository,
}

impl EventService {
    pub fn new(events: EventRepository) -> Self {
        Self { events }
    }

    /// Create a new event, restricted to EDITOR and ADMIN
    ///
    /// Events start with an empty participant counter; only the admission
    /// workflow moves it afterwards.
    pub async fn create_event(
        &self,
        request: CreateEventRequest,
        author_id: Uuid,
        caller_role: Role,
    ) -> Result<Event> {
        auth::require(Operation::ManageEvents, caller_role)?;

        if request.max_participants <= 0 {
            return Err(VsmError::InvalidInput(
                "Max participants must be greater than 0".to_string(),
            ));
        }

        let event = self.events.create(request, Some(author_id)).await?;
        info!(event_id = %event.id, author_id = %author_id, "Event created");
        Ok(event)
    }

    /// Update an event, restricted to EDITOR and ADMIN
    pub async fn update_event(
        &self,
        event_id: Uuid,
        request: UpdateEventRequest,
        caller_role: Role,
    ) -> Result<Event> {
        auth::require(Operation::ManageEvents, caller_role)?;

        if matches!(request.max_participants, Some(max) if max <= 0) {
            return Err(VsmError::InvalidInput(
                "Max participants must be greater than 0".to_string(),
            ));
        }

        let event = self.events.update(event_id, request).await?;
        info!(event_id = %event_id, "Event updated");
        Ok(event)
    }

    /// Delete an event, restricted to EDITOR and ADMIN
    pub async fn delete_event(&self, event_id: Uuid, caller_role: Role) -> Result<()> {
        auth::require(Operation::ManageEvents, caller_role)?;

        self.events.delete(event_id).await?;
        log_admin_action("delete_event", Some(&event_id.to_string()), None);
        Ok(())
    }

    /// Get an event by ID
    pub async fn get_event(&self, event_id: Uuid) -> Result<Event> {
        debug!(event_id = %event_id, "Getting event");
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(VsmError::EventNotFound { event_id })
    }

    /// List published events ordered by date
    pub async fn list_published_events(&self, limit: i64, offset: i64) -> Result<Vec<Event>> {
        self.events.list_published(limit, offset).await
    }
}
