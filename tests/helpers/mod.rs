//! Shared test helpers

pub mod database_helper;
pub mod test_data;

pub use database_helper::TestDatabase;
pub use test_data::{applicant, create_event, create_event_at, create_user};
