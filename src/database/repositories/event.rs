//! Event repository implementation
//!
//! Pool-scoped methods cover event authoring and reads. The
//! transaction-scoped methods take a live connection so that admission
//! decisions and counter updates can share one transaction; the
//! participant counter is only ever mutated through
//! [`EventRepository::adjust_participant_count`].

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::utils::errors::VsmError;

const EVENT_COLUMNS: &str = "id, name, description, date, location, max_participants, current_participants, registration_deadline, published, author_id, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(
        &self,
        request: CreateEventRequest,
        author_id: Option<Uuid>,
    ) -> Result<Event, VsmError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (id, name, description, date, location, max_participants, current_participants, registration_deadline, published, author_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $8, $9, $10, $11)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.name)
        .bind(request.description)
        .bind(request.date)
        .bind(request.location)
        .bind(request.max_participants)
        .bind(request.registration_deadline)
        .bind(request.published.unwrap_or(false))
        .bind(author_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, VsmError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event
    pub async fn update(&self, id: Uuid, request: UpdateEventRequest) -> Result<Event, VsmError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                location = COALESCE($5, location),
                max_participants = COALESCE($6, max_participants),
                registration_deadline = COALESCE($7, registration_deadline),
                published = COALESCE($8, published),
                updated_at = $9
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.date)
        .bind(request.location)
        .bind(request.max_participants)
        .bind(request.registration_deadline)
        .bind(request.published)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(VsmError::EventNotFound { event_id: id })?;

        Ok(event)
    }

    /// Delete event
    pub async fn delete(&self, id: Uuid) -> Result<(), VsmError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(VsmError::EventNotFound { event_id: id });
        }

        Ok(())
    }

    /// List published upcoming events
    pub async fn list_published(&self, limit: i64, offset: i64) -> Result<Vec<Event>, VsmError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE published = true ORDER BY date ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, VsmError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Lock and load an event row within a transaction
    ///
    /// Admission requests for the same event queue behind this lock, so the
    /// duplicate check, capacity count and counter update that follow all see
    /// a stable snapshot.
    pub async fn find_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Event>, VsmError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(event)
    }

    /// Adjust the denormalized participant counter within a transaction
    ///
    /// The schema CHECK keeps the counter from going negative even if a
    /// caller violates the transition rules.
    pub async fn adjust_participant_count(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        delta: i32,
    ) -> Result<(), VsmError> {
        sqlx::query(
            "UPDATE events SET current_participants = current_participants + $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
