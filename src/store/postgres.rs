use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Account, Todo, TodoStatus};
use crate::store::{AccountStore, Result, StoreError, TodoStore};

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, created_at, updated_at";
const TODO_COLUMNS: &str = "id, title, status, owner_id, created_at, updated_at";

/// PostgreSQL-backed storage. The `accounts.email` UNIQUE constraint is what
/// ultimately serializes concurrent sign-ups.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE email = $1", ACCOUNT_COLUMNS);
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE id = $1", ACCOUNT_COLUMNS);
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn save(&self, account: Account) -> Result<Account> {
        let sql = format!(
            "INSERT INTO accounts (id, email, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ACCOUNT_COLUMNS
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(account.id)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.created_at)
            .bind(account.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    StoreError::DuplicateEmail(account.email.clone())
                }
                other => other.into(),
            })
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Todo>> {
        let sql = format!(
            "SELECT {} FROM todos WHERE owner_id = $1 ORDER BY created_at DESC",
            TODO_COLUMNS
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Todo>> {
        let sql = format!(
            "SELECT {} FROM todos WHERE id = $1 AND owner_id = $2",
            TODO_COLUMNS
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn insert(&self, todo: Todo) -> Result<Todo> {
        let sql = format!(
            "INSERT INTO todos (id, title, status, owner_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            TODO_COLUMNS
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(todo.id)
            .bind(todo.title)
            .bind(todo.status)
            .bind(todo.owner_id)
            .bind(todo.created_at)
            .bind(todo.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn update_title(&self, owner_id: Uuid, id: Uuid, title: &str) -> Result<Option<Todo>> {
        let sql = format!(
            "UPDATE todos SET title = $1, updated_at = NOW() \
             WHERE id = $2 AND owner_id = $3 RETURNING {}",
            TODO_COLUMNS
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(title)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn update_status(
        &self,
        owner_id: Uuid,
        id: Uuid,
        status: TodoStatus,
    ) -> Result<Option<Todo>> {
        let sql = format!(
            "UPDATE todos SET status = $1, updated_at = NOW() \
             WHERE id = $2 AND owner_id = $3 RETURNING {}",
            TODO_COLUMNS
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(status)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
