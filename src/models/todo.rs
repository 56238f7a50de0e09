use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Represents the status of a todo.
/// Corresponds to the `todo_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "todo_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    /// Newly created, not done yet.
    Pending,
    /// Done.
    Completed,
}

/// Input structure for creating a todo or renaming an existing one.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    /// Must be between 1 and 200 characters, and not only whitespace.
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub title: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Represents a todo entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Todo {
    /// Unique identifier for the todo (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub status: TodoStatus,
    /// Owning account. Not exposed to clients.
    #[serde(skip_serializing, default)]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new pending `Todo` owned by `owner_id`.
    pub fn new(id: Uuid, input: TodoInput, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: input.title,
            status: TodoStatus::Pending,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}
