//! Persistence seams for accounts and todos.
//!
//! Both traits have a PostgreSQL implementation (`PgStore`) used by the server and an
//! in-memory implementation (`MemoryStore`) used by tests and local experiments.
//! Email uniqueness is enforced by the store itself: `save` rejects a second account
//! with the same email even when two sign-ups race past the caller's own lookup.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Account, Todo, TodoStatus};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("email `{0}` is already registered")]
    DuplicateEmail(String),
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        StoreError::Database(error.to_string())
    }
}

/// Credential store: the durable email → account mapping.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    /// Persists a new account. Fails with `StoreError::DuplicateEmail` when the
    /// email is already taken.
    async fn save(&self, account: Account) -> Result<Account>;
}

/// Todo persistence. Every lookup is scoped to the owning account.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Newest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Todo>>;

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Todo>>;

    async fn insert(&self, todo: Todo) -> Result<Todo>;

    async fn update_title(&self, owner_id: Uuid, id: Uuid, title: &str) -> Result<Option<Todo>>;

    async fn update_status(
        &self,
        owner_id: Uuid,
        id: Uuid,
        status: TodoStatus,
    ) -> Result<Option<Todo>>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool>;
}
