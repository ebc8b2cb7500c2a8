//! Registration repository implementation
//!
//! Pool-scoped methods serve plain reads. The transaction-scoped methods
//! take a live connection so the admission controller can run the duplicate
//! check, capacity count, insert and counter update atomically while it
//! holds the event row lock.

use chrono::{DateTime, Utc};
use futures::try_join;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::models::event::EventSummary;
use crate::models::registration::{
    ExperienceLevel, RegisterEventRequest, Registration, RegistrationStats, RegistrationStatus,
    RegistrationWithEvent, RegistrationWithUser,
};
use crate::models::user::UserSummary;
use crate::utils::errors::VsmError;

const REGISTRATION_COLUMNS: &str = "id, event_id, user_id, full_name, email, phone, emergency_contact, emergency_phone, medical_conditions, experience, status, registered_at";

/// Flattened join row for registration + event summary queries
#[derive(Debug, FromRow)]
struct RegistrationEventRow {
    id: Uuid,
    event_id: Uuid,
    user_id: Uuid,
    full_name: String,
    email: String,
    phone: String,
    emergency_contact: String,
    emergency_phone: Option<String>,
    medical_conditions: Option<String>,
    experience: ExperienceLevel,
    status: RegistrationStatus,
    registered_at: DateTime<Utc>,
    event_name: String,
    event_date: DateTime<Utc>,
    event_location: Option<String>,
}

impl From<RegistrationEventRow> for RegistrationWithEvent {
    fn from(row: RegistrationEventRow) -> Self {
        RegistrationWithEvent {
            event: EventSummary {
                id: row.event_id,
                name: row.event_name,
                date: row.event_date,
                location: row.event_location,
            },
            registration: Registration {
                id: row.id,
                event_id: row.event_id,
                user_id: row.user_id,
                full_name: row.full_name,
                email: row.email,
                phone: row.phone,
                emergency_contact: row.emergency_contact,
                emergency_phone: row.emergency_phone,
                medical_conditions: row.medical_conditions,
                experience: row.experience,
                status: row.status,
                registered_at: row.registered_at,
            },
        }
    }
}

/// Flattened join row for registration + event + user summary queries
#[derive(Debug, FromRow)]
struct RegistrationUserRow {
    id: Uuid,
    event_id: Uuid,
    user_id: Uuid,
    full_name: String,
    email: String,
    phone: String,
    emergency_contact: String,
    emergency_phone: Option<String>,
    medical_conditions: Option<String>,
    experience: ExperienceLevel,
    status: RegistrationStatus,
    registered_at: DateTime<Utc>,
    event_name: String,
    event_date: DateTime<Utc>,
    event_location: Option<String>,
    user_name: String,
    user_email: String,
    user_avatar: Option<String>,
}

impl From<RegistrationUserRow> for RegistrationWithUser {
    fn from(row: RegistrationUserRow) -> Self {
        RegistrationWithUser {
            event: EventSummary {
                id: row.event_id,
                name: row.event_name,
                date: row.event_date,
                location: row.event_location,
            },
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
                avatar: row.user_avatar,
            },
            registration: Registration {
                id: row.id,
                event_id: row.event_id,
                user_id: row.user_id,
                full_name: row.full_name,
                email: row.email,
                phone: row.phone,
                emergency_contact: row.emergency_contact,
                emergency_phone: row.emergency_phone,
                medical_conditions: row.medical_conditions,
                experience: row.experience,
                status: row.status,
                registered_at: row.registered_at,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find registration by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>, VsmError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// List a user's registrations with their event summaries, newest first
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<RegistrationWithEvent>, VsmError> {
        let rows = sqlx::query_as::<_, RegistrationEventRow>(
            r#"
            SELECT r.id, r.event_id, r.user_id, r.full_name, r.email, r.phone,
                   r.emergency_contact, r.emergency_phone, r.medical_conditions,
                   r.experience, r.status, r.registered_at,
                   e.name AS event_name, e.date AS event_date, e.location AS event_location
            FROM event_registrations r
            INNER JOIN events e ON e.id = r.event_id
            WHERE r.user_id = $1
            ORDER BY r.registered_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RegistrationWithEvent::from).collect())
    }

    /// List an event's registrations with applicant user summaries, newest first
    pub async fn list_by_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<RegistrationWithUser>, VsmError> {
        let rows = sqlx::query_as::<_, RegistrationUserRow>(
            r#"
            SELECT r.id, r.event_id, r.user_id, r.full_name, r.email, r.phone,
                   r.emergency_contact, r.emergency_phone, r.medical_conditions,
                   r.experience, r.status, r.registered_at,
                   e.name AS event_name, e.date AS event_date, e.location AS event_location,
                   u.name AS user_name, u.email AS user_email, u.avatar AS user_avatar
            FROM event_registrations r
            INNER JOIN events e ON e.id = r.event_id
            INNER JOIN users u ON u.id = r.user_id
            WHERE r.event_id = $1
            ORDER BY r.registered_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RegistrationWithUser::from).collect())
    }

    /// Load a registration together with its event and user summaries
    pub async fn find_with_user(
        &self,
        id: Uuid,
    ) -> Result<Option<RegistrationWithUser>, VsmError> {
        let row = sqlx::query_as::<_, RegistrationUserRow>(
            r#"
            SELECT r.id, r.event_id, r.user_id, r.full_name, r.email, r.phone,
                   r.emergency_contact, r.emergency_phone, r.medical_conditions,
                   r.experience, r.status, r.registered_at,
                   e.name AS event_name, e.date AS event_date, e.location AS event_location,
                   u.name AS user_name, u.email AS user_email, u.avatar AS user_avatar
            FROM event_registrations r
            INNER JOIN events e ON e.id = r.event_id
            INNER JOIN users u ON u.id = r.user_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RegistrationWithUser::from))
    }

    /// Counts of registrations grouped by status, optionally scoped to one event
    pub async fn stats(&self, event_id: Option<Uuid>) -> Result<RegistrationStats, VsmError> {
        let (total, confirmed, pending, waitlist, cancelled) = try_join!(
            self.count_by_status(event_id, None),
            self.count_by_status(event_id, Some(RegistrationStatus::Confirmed)),
            self.count_by_status(event_id, Some(RegistrationStatus::Pending)),
            self.count_by_status(event_id, Some(RegistrationStatus::Waitlist)),
            self.count_by_status(event_id, Some(RegistrationStatus::Cancelled)),
        )?;

        Ok(RegistrationStats {
            total,
            confirmed,
            pending,
            waitlist,
            cancelled,
        })
    }

    async fn count_by_status(
        &self,
        event_id: Option<Uuid>,
        status: Option<RegistrationStatus>,
    ) -> Result<i64, VsmError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM event_registrations
            WHERE ($1::uuid IS NULL OR event_id = $1)
              AND ($2::registration_status IS NULL OR status = $2)
            "#,
        )
        .bind(event_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Check for an existing registration of this user for this event
    pub async fn exists_for_pair(
        &self,
        conn: &mut PgConnection,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, VsmError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count.0 > 0)
    }

    /// Count CONFIRMED registrations for an event
    pub async fn count_confirmed(
        &self,
        conn: &mut PgConnection,
        event_id: Uuid,
    ) -> Result<i64, VsmError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1 AND status = $2",
        )
        .bind(event_id)
        .bind(RegistrationStatus::Confirmed)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count.0)
    }

    /// Insert a new registration row
    ///
    /// The unique (event_id, user_id) index backstops the application-level
    /// duplicate check; a violation surfaces as `AlreadyRegistered`.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        event_id: Uuid,
        user_id: Uuid,
        request: RegisterEventRequest,
        status: RegistrationStatus,
    ) -> Result<Registration, VsmError> {
        let result = sqlx::query_as::<_, Registration>(&format!(
            r#"
            INSERT INTO event_registrations (id, event_id, user_id, full_name, email, phone, emergency_contact, emergency_phone, medical_conditions, experience, status, registered_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(user_id)
        .bind(request.full_name)
        .bind(request.email)
        .bind(request.phone)
        .bind(request.emergency_contact)
        .bind(request.emergency_phone)
        .bind(request.medical_conditions)
        .bind(request.experience)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await;

        match result {
            Ok(registration) => Ok(registration),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(VsmError::AlreadyRegistered { event_id })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Lock and load a registration row within a transaction
    pub async fn find_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Registration>, VsmError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(registration)
    }

    /// Lock and load a registration owned by the given user
    ///
    /// Missing row and foreign row are indistinguishable to the caller so
    /// that one user cannot probe for another user's registrations.
    pub async fn find_for_user_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Registration>, VsmError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(registration)
    }

    /// Set a registration's status within a transaction
    pub async fn set_status(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Registration, VsmError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            UPDATE event_registrations
            SET status = $2
            WHERE id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(VsmError::RegistrationNotFound { registration_id: id })?;

        Ok(registration)
    }
}
