//! Test fixture builders

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;
use vsm_backend::database::DatabaseService;
use vsm_backend::models::{
    CreateEventRequest, CreateUserRequest, Event, ExperienceLevel, RegisterEventRequest, Role,
    User,
};

/// Create a user with a unique email
pub async fn create_user(db: &DatabaseService, role: Role) -> anyhow::Result<User> {
    let tag = Uuid::new_v4().simple().to_string();
    let user = db
        .users
        .create(CreateUserRequest {
            name: format!("Runner {}", &tag[..8]),
            email: format!("runner-{tag}@example.com"),
            avatar: None,
            role: Some(role),
        })
        .await?;
    Ok(user)
}

/// Create a published future event with the given capacity
pub async fn create_event(db: &DatabaseService, max_participants: i32) -> anyhow::Result<Event> {
    create_event_at(db, max_participants, Utc::now() + Duration::days(30), true).await
}

/// Create an event with explicit date and publication flag
pub async fn create_event_at(
    db: &DatabaseService,
    max_participants: i32,
    date: DateTime<Utc>,
    published: bool,
) -> anyhow::Result<Event> {
    let event = db
        .events
        .create(
            CreateEventRequest {
                name: "VSM Hanoi Half Marathon".to_string(),
                description: Some("21km through the old quarter".to_string()),
                date,
                location: Some("Hanoi".to_string()),
                max_participants,
                registration_deadline: None,
                published: Some(published),
            },
            None,
        )
        .await?;
    Ok(event)
}

/// A well-formed applicant payload
pub fn applicant() -> RegisterEventRequest {
    RegisterEventRequest {
        full_name: "Tran Thi Mai".to_string(),
        email: "mai.tran@example.com".to_string(),
        phone: "0912345678".to_string(),
        emergency_contact: "Tran Van Nam".to_string(),
        emergency_phone: Some("0998765432".to_string()),
        medical_conditions: None,
        experience: ExperienceLevel::Intermediate,
    }
}
