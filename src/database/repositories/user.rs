//! User repository implementation
//!
//! The admission core only ever reads users; creation exists for the
//! account-provisioning flow and test fixtures.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{CreateUserRequest, Role, User};
use crate::utils::errors::VsmError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, VsmError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, avatar, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, avatar, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name)
        .bind(request.email)
        .bind(request.avatar)
        .bind(request.role.unwrap_or(Role::User))
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, VsmError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, avatar, role, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, VsmError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, avatar, role, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
