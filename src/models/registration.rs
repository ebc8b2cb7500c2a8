//! Event registration model

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::event::EventSummary;
use crate::models::user::UserSummary;
use crate::utils::errors::VsmError;

/// Registration lifecycle status, exact wire strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "registration_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Waitlist,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "PENDING",
            RegistrationStatus::Confirmed => "CONFIRMED",
            RegistrationStatus::Waitlist => "WAITLIST",
            RegistrationStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = VsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(RegistrationStatus::Pending),
            "CONFIRMED" => Ok(RegistrationStatus::Confirmed),
            "WAITLIST" => Ok(RegistrationStatus::Waitlist),
            "CANCELLED" => Ok(RegistrationStatus::Cancelled),
            other => Err(VsmError::InvalidStatus(other.to_string())),
        }
    }
}

/// Applicant experience level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "experience_level", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub emergency_contact: String,
    pub emergency_phone: Option<String>,
    pub medical_conditions: Option<String>,
    pub experience: ExperienceLevel,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

/// Applicant data supplied when registering for an event
///
/// Stored verbatim; the admission logic never interprets these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterEventRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub emergency_contact: String,
    pub emergency_phone: Option<String>,
    pub medical_conditions: Option<String>,
    pub experience: ExperienceLevel,
}

impl RegisterEventRequest {
    /// Validate applicant field shapes
    pub fn validate(&self) -> Result<(), VsmError> {
        if self.full_name.chars().count() < 2 {
            return Err(VsmError::InvalidInput(
                "Full name must be at least 2 characters".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(VsmError::InvalidInput("Invalid email address".to_string()));
        }
        if self.phone.chars().count() < 10 {
            return Err(VsmError::InvalidInput(
                "Phone number must be at least 10 characters".to_string(),
            ));
        }
        if self.emergency_contact.chars().count() < 2 {
            return Err(VsmError::InvalidInput(
                "Emergency contact must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Registration together with the summary of its event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationWithEvent {
    #[serde(flatten)]
    pub registration: Registration,
    pub event: EventSummary,
}

/// Registration together with event and applicant user summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationWithUser {
    #[serde(flatten)]
    pub registration: Registration,
    pub event: EventSummary,
    pub user: UserSummary,
}

/// Counts of registrations grouped by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationStats {
    pub total: i64,
    pub confirmed: i64,
    pub pending: i64,
    pub waitlist: i64,
    pub cancelled: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(RegistrationStatus::Pending.to_string(), "PENDING");
        assert_eq!(RegistrationStatus::Confirmed.to_string(), "CONFIRMED");
        assert_eq!(RegistrationStatus::Waitlist.to_string(), "WAITLIST");
        assert_eq!(RegistrationStatus::Cancelled.to_string(), "CANCELLED");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "WAITLIST".parse::<RegistrationStatus>().unwrap(),
            RegistrationStatus::Waitlist
        );
        // case-sensitive on the wire
        assert!("waitlist".parse::<RegistrationStatus>().is_err());
        assert!("UNKNOWN".parse::<RegistrationStatus>().is_err());
    }

    #[test]
    fn test_status_serde_round_trip() {
        let json = serde_json::to_string(&RegistrationStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
        let status: RegistrationStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, RegistrationStatus::Cancelled);
    }

    fn applicant() -> RegisterEventRequest {
        RegisterEventRequest {
            full_name: "Nguyen Van A".to_string(),
            email: "a.nguyen@example.com".to_string(),
            phone: "0901234567".to_string(),
            emergency_contact: "Nguyen Van B".to_string(),
            emergency_phone: None,
            medical_conditions: None,
            experience: ExperienceLevel::Beginner,
        }
    }

    #[test]
    fn test_applicant_validation() {
        assert!(applicant().validate().is_ok());

        let mut short_name = applicant();
        short_name.full_name = "A".to_string();
        assert!(short_name.validate().is_err());

        let mut bad_email = applicant();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut short_phone = applicant();
        short_phone.phone = "12345".to_string();
        assert!(short_phone.validate().is_err());

        let mut no_contact = applicant();
        no_contact.emergency_contact = "".to_string();
        assert!(no_contact.validate().is_err());
    }
}
