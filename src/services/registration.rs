//! Registration admission service
//!
//! Owns the decision of what status a new or updated registration receives
//! and keeps the event's denormalized participant counter consistent with
//! that decision. Every counter-touching operation runs inside a single
//! transaction holding a row lock on the event, so concurrent admissions
//! for the same event are serialized: the duplicate check, the capacity
//! count and the insert all see a stable snapshot.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::{DatabasePool, EventRepository, RegistrationRepository};
use crate::models::event::EventSummary;
use crate::models::registration::{
    RegisterEventRequest, Registration, RegistrationStats, RegistrationStatus,
    RegistrationWithEvent, RegistrationWithUser,
};
use crate::models::user::Role;
use crate::services::auth::{self, Operation};
use crate::utils::errors::{Result, VsmError};
use crate::utils::logging::log_registration_action;

/// Fraction of capacity at which new registrations are pushed to the
/// waitlist, reserving the tail of capacity as a buffer
pub const CAPACITY_BUFFER: f64 = 0.9;

/// Decide the initial status of a new registration from the current
/// CONFIRMED count and the event capacity
pub fn decide_status(confirmed_count: i64, max_participants: i32) -> RegistrationStatus {
    if confirmed_count >= i64::from(max_participants) {
        return RegistrationStatus::Waitlist;
    }
    if confirmed_count as f64 >= CAPACITY_BUFFER * f64::from(max_participants) {
        return RegistrationStatus::Waitlist;
    }
    RegistrationStatus::Pending
}

/// Participant counter adjustment for a status transition
///
/// Only transitions into and out of CONFIRMED move the counter.
pub fn counter_delta(old: RegistrationStatus, new: RegistrationStatus) -> i32 {
    match (old, new) {
        (RegistrationStatus::Confirmed, n) if n != RegistrationStatus::Confirmed => -1,
        (o, RegistrationStatus::Confirmed) if o != RegistrationStatus::Confirmed => 1,
        _ => 0,
    }
}

/// Registration admission service
#[derive(Debug, Clone)]
pub struct RegistrationService {
    pool: DatabasePool,
    events: EventRepository,
    registrations: RegistrationRepository,
}

impl RegistrationService {
    pub fn new(
        pool: DatabasePool,
        events: EventRepository,
        registrations: RegistrationRepository,
    ) -> Self {
        Self {
            pool,
            events,
            registrations,
        }
    }

    /// Register a user for an event
    ///
    /// Preconditions are checked in order, first failure wins: the event
    /// must exist, be published, be before its registration deadline, and
    /// the user must not already hold a registration for it. The admitted
    /// status follows the capacity buffer rule; the participant counter is
    /// incremented only for PENDING admissions.
    pub async fn register_for_event(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        request: RegisterEventRequest,
    ) -> Result<RegistrationWithEvent> {
        request.validate()?;

        debug!(event_id = %event_id, user_id = %user_id, "Processing registration request");

        let mut tx = self.pool.begin().await?;

        let event = self
            .events
            .find_for_update(&mut tx, event_id)
            .await?
            .ok_or(VsmError::EventNotFound { event_id })?;

        if !event.published {
            return Err(VsmError::EventNotPublished { event_id });
        }

        if let Some(deadline) = event.registration_deadline {
            if Utc::now() > deadline {
                return Err(VsmError::DeadlinePassed { event_id });
            }
        }

        if self
            .registrations
            .exists_for_pair(&mut tx, event_id, user_id)
            .await?
        {
            return Err(VsmError::AlreadyRegistered { event_id });
        }

        let confirmed_count = self.registrations.count_confirmed(&mut tx, event_id).await?;
        let status = decide_status(confirmed_count, event.max_participants);

        let registration = self
            .registrations
            .insert(&mut tx, event_id, user_id, request, status)
            .await?;

        if status == RegistrationStatus::Pending {
            self.events
                .adjust_participant_count(&mut tx, event_id, 1)
                .await?;
        }

        tx.commit().await?;

        log_registration_action(event_id, user_id, "register", Some(status.as_str()));
        info!(
            event_id = %event_id,
            user_id = %user_id,
            status = %status,
            confirmed_count = confirmed_count,
            max_participants = event.max_participants,
            "Registration admitted"
        );

        Ok(RegistrationWithEvent {
            registration,
            event: EventSummary {
                id: event.id,
                name: event.name,
                date: event.date,
                location: event.location,
            },
        })
    }

    /// Change a registration's status on behalf of an applicant
    ///
    /// Restricted to EDITOR and ADMIN. Re-applying the current status is a
    /// hard rejection, never a silent no-op, and never moves the counter.
    pub async fn update_registration_status(
        &self,
        registration_id: Uuid,
        new_status: RegistrationStatus,
        caller_role: Role,
    ) -> Result<RegistrationWithUser> {
        auth::require(Operation::UpdateRegistrationStatus, caller_role)?;

        let mut tx = self.pool.begin().await?;

        let registration = self
            .registrations
            .find_for_update(&mut tx, registration_id)
            .await?
            .ok_or(VsmError::RegistrationNotFound { registration_id })?;

        let old_status = registration.status;
        if old_status == new_status {
            return Err(VsmError::StatusUnchanged {
                status: new_status.to_string(),
            });
        }

        self.registrations
            .set_status(&mut tx, registration_id, new_status)
            .await?;

        let delta = counter_delta(old_status, new_status);
        if delta != 0 {
            let event_id = registration.event_id;
            self.events
                .find_for_update(&mut tx, event_id)
                .await?
                .ok_or(VsmError::EventNotFound { event_id })?;
            self.events
                .adjust_participant_count(&mut tx, event_id, delta)
                .await?;
        }

        tx.commit().await?;

        log_registration_action(
            registration.event_id,
            registration.user_id,
            "update_status",
            Some(new_status.as_str()),
        );
        info!(
            registration_id = %registration_id,
            old_status = %old_status,
            new_status = %new_status,
            counter_delta = delta,
            "Registration status updated"
        );

        self.registrations
            .find_with_user(registration_id)
            .await?
            .ok_or(VsmError::RegistrationNotFound { registration_id })
    }

    /// Cancel the caller's own registration
    ///
    /// Lookup is scoped to the calling user, so a foreign registration id
    /// reports NotFound rather than revealing its existence. Cancelling an
    /// already-CANCELLED registration is a no-op.
    pub async fn cancel_registration(
        &self,
        registration_id: Uuid,
        user_id: Uuid,
    ) -> Result<Registration> {
        let mut tx = self.pool.begin().await?;

        let registration = self
            .registrations
            .find_for_user_update(&mut tx, registration_id, user_id)
            .await?
            .ok_or(VsmError::RegistrationNotFound { registration_id })?;

        let event_id = registration.event_id;
        let event = self
            .events
            .find_for_update(&mut tx, event_id)
            .await?
            .ok_or(VsmError::EventNotFound { event_id })?;

        if event.date <= Utc::now() {
            return Err(VsmError::EventAlreadyOccurred { event_id });
        }

        if registration.status == RegistrationStatus::Cancelled {
            tx.commit().await?;
            debug!(registration_id = %registration_id, "Registration already cancelled");
            return Ok(registration);
        }

        let updated = self
            .registrations
            .set_status(&mut tx, registration_id, RegistrationStatus::Cancelled)
            .await?;

        if registration.status == RegistrationStatus::Confirmed {
            self.events
                .adjust_participant_count(&mut tx, event_id, -1)
                .await?;
        }

        tx.commit().await?;

        log_registration_action(event_id, user_id, "cancel", Some("CANCELLED"));
        info!(
            registration_id = %registration_id,
            prior_status = %registration.status,
            "Registration cancelled"
        );

        Ok(updated)
    }

    /// Counts of registrations grouped by status, optionally for one event
    pub async fn get_registration_stats(
        &self,
        event_id: Option<Uuid>,
        caller_role: Role,
    ) -> Result<RegistrationStats> {
        auth::require(Operation::ViewRegistrationStats, caller_role)?;
        self.registrations.stats(event_id).await
    }

    /// List the caller's own registrations, newest first
    pub async fn get_user_registrations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RegistrationWithEvent>> {
        self.registrations.list_by_user(user_id).await
    }

    /// List all registrations for an event, newest first
    ///
    /// Restricted to EDITOR and ADMIN.
    pub async fn get_event_registrations(
        &self,
        event_id: Uuid,
        caller_role: Role,
    ) -> Result<Vec<RegistrationWithUser>> {
        auth::require(Operation::ViewEventRegistrations, caller_role)?;
        self.registrations.list_by_event(event_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_admission_below_buffer_is_pending() {
        assert_eq!(decide_status(0, 10), RegistrationStatus::Pending);
        assert_eq!(decide_status(5, 10), RegistrationStatus::Pending);
        assert_eq!(decide_status(8, 10), RegistrationStatus::Pending);
    }

    #[test]
    fn test_admission_at_buffer_boundary_is_waitlist() {
        // 9 >= 0.9 * 10
        assert_eq!(decide_status(9, 10), RegistrationStatus::Waitlist);
    }

    #[test]
    fn test_admission_at_or_over_capacity_is_waitlist() {
        assert_eq!(decide_status(10, 10), RegistrationStatus::Waitlist);
        assert_eq!(decide_status(11, 10), RegistrationStatus::Waitlist);
    }

    #[test]
    fn test_small_events_admit_until_buffer() {
        // buffer for max=2 sits at 1.8, so one CONFIRMED still admits
        assert_eq!(decide_status(0, 2), RegistrationStatus::Pending);
        assert_eq!(decide_status(1, 2), RegistrationStatus::Pending);
        assert_eq!(decide_status(2, 2), RegistrationStatus::Waitlist);
        // a single-slot event still takes its first registration
        assert_eq!(decide_status(0, 1), RegistrationStatus::Pending);
        assert_eq!(decide_status(1, 1), RegistrationStatus::Waitlist);
    }

    #[test]
    fn test_counter_delta_matrix() {
        use RegistrationStatus::*;

        assert_eq!(counter_delta(Confirmed, Pending), -1);
        assert_eq!(counter_delta(Confirmed, Waitlist), -1);
        assert_eq!(counter_delta(Confirmed, Cancelled), -1);
        assert_eq!(counter_delta(Pending, Confirmed), 1);
        assert_eq!(counter_delta(Waitlist, Confirmed), 1);
        assert_eq!(counter_delta(Cancelled, Confirmed), 1);
        assert_eq!(counter_delta(Pending, Waitlist), 0);
        assert_eq!(counter_delta(Waitlist, Cancelled), 0);
        assert_eq!(counter_delta(Cancelled, Pending), 0);
    }

    proptest! {
        #[test]
        fn prop_pending_admission_implies_room_below_buffer(
            confirmed in 0i64..2000,
            max in 1i32..1000,
        ) {
            let status = decide_status(confirmed, max);
            match status {
                RegistrationStatus::Pending => {
                    prop_assert!(confirmed < i64::from(max));
                    prop_assert!((confirmed as f64) < CAPACITY_BUFFER * f64::from(max));
                }
                RegistrationStatus::Waitlist => {
                    prop_assert!(
                        confirmed >= i64::from(max)
                            || (confirmed as f64) >= CAPACITY_BUFFER * f64::from(max)
                    );
                }
                _ => prop_assert!(false, "admission never yields {:?}", status),
            }
        }

        #[test]
        fn prop_counter_delta_is_bounded_and_antisymmetric(
            old in 0usize..4,
            new in 0usize..4,
        ) {
            use RegistrationStatus::*;
            let statuses = [Pending, Confirmed, Waitlist, Cancelled];
            let delta = counter_delta(statuses[old], statuses[new]);
            prop_assert!((-1..=1).contains(&delta));
            prop_assert_eq!(delta, -counter_delta(statuses[new], statuses[old]));
            if old == new {
                prop_assert_eq!(delta, 0);
            }
        }
    }
}
